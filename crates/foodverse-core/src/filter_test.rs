use super::*;
use crate::listing::ListingKind;

fn listing(id: i64, name: &str, discount: u8, distance: f64, category: &str) -> Listing {
    Listing {
        id,
        kind: ListingKind::FoodBag,
        name: name.to_owned(),
        description: String::new(),
        address: String::new(),
        category: category.to_owned(),
        tags: vec![category.to_owned()],
        distance_km: Some(distance),
        discount_percent: Some(discount),
        rating: 4.5,
        availability: Some(Availability::Today),
        quantity_left: Some(3),
        store_id: Some(100 + id),
        price: Some(5.0),
    }
}

fn bakery_and_sushi() -> Vec<Listing> {
    vec![
        listing(1, "Bella's Bakery", 50, 0.8, "Bakery"),
        listing(2, "Sushi Station", 65, 1.5, "Restaurant"),
    ]
}

/// A larger fixture modelled on the Explore page sample set.
fn explore_set() -> Vec<Listing> {
    let mut items = vec![
        listing(1, "Bella's Bakery", 50, 0.8, "Bakery"),
        listing(2, "Green Garden Cafe", 60, 1.2, "Cafe"),
        listing(3, "Pasta Paradise", 55, 0.5, "Restaurant"),
        listing(4, "Sushi Station", 65, 1.5, "Restaurant"),
        listing(5, "Taco Time", 50, 0.7, "Fast Food"),
        listing(6, "Pizza Place", 55, 1.0, "Fast Food"),
        listing(7, "Vegan Delights", 70, 2.3, "Vegan"),
        listing(8, "Sweet Treats", 60, 3.1, "Dessert"),
    ];
    items[0].tags = vec!["Bakery".into(), "Pastries".into(), "Bread".into()];
    items[1].tags = vec!["Cafe".into(), "Organic".into(), "Vegan".into()];
    items[1].rating = 4.5;
    items[2].availability = Some(Availability::Tomorrow);
    items[2].rating = 4.7;
    items[3].tags = vec!["Japanese".into(), "Sushi".into(), "Seafood".into()];
    items[3].availability = Some(Availability::Now);
    items[3].rating = 4.9;
    items[3].address = "101 Pine Rd, Anytown".into();
    items[4].availability = Some(Availability::Now);
    items[4].rating = 4.6;
    items[5].availability = Some(Availability::Tomorrow);
    items[5].rating = 4.4;
    items[6].tags = vec!["Vegan".into(), "Healthy".into(), "Organic".into()];
    items[6].rating = 4.7;
    items[7].tags = vec!["Dessert".into(), "Bakery".into(), "Sweets".into()];
    items[7].availability = Some(Availability::Now);
    items[7].rating = 4.8;
    items[0].rating = 4.8;
    items
}

fn ids(listings: &[Listing]) -> Vec<i64> {
    listings.iter().map(|l| l.id).collect()
}

// -----------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------

#[test]
fn min_discount_keeps_only_deeper_discounts() {
    let criteria = FilterCriteria {
        min_discount_percent: 60,
        ..FilterCriteria::default()
    };
    let result = filter_and_sort(&bakery_and_sushi(), &criteria);
    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn max_distance_keeps_only_nearby() {
    let criteria = FilterCriteria {
        max_distance_km: 1.0,
        ..FilterCriteria::default()
    };
    let result = filter_and_sort(&bakery_and_sushi(), &criteria);
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn query_matches_name_case_insensitively() {
    let criteria = FilterCriteria {
        query: "sushi".to_owned(),
        ..FilterCriteria::default()
    };
    let result = filter_and_sort(&bakery_and_sushi(), &criteria);
    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn query_matches_tags_and_address() {
    let set = explore_set();
    let by_tag = FilterCriteria {
        query: "ORGANIC".to_owned(),
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_and_sort(&set, &by_tag)), vec![2, 7]);

    let by_address = FilterCriteria {
        query: "pine rd".to_owned(),
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_and_sort(&set, &by_address)), vec![4]);
}

#[test]
fn query_matches_description_only() {
    let mut set = bakery_and_sushi();
    set[1].description = "Leftover nigiri and Onigiri boxes".to_owned();
    let criteria = FilterCriteria {
        query: "onigiri".to_owned(),
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_and_sort(&set, &criteria)), vec![2]);
}

#[test]
fn query_is_substring_not_token_match() {
    let criteria = FilterCriteria {
        query: "ell".to_owned(),
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_and_sort(&bakery_and_sushi(), &criteria)), vec![1]);
}

#[test]
fn category_matches_category_or_tag() {
    let set = explore_set();
    let mut criteria = FilterCriteria::default();
    criteria.categories.insert("bakery".to_owned());
    // Bella's by category, Sweet Treats by tag.
    assert_eq!(ids(&filter_and_sort(&set, &criteria)), vec![1, 8]);
}

#[test]
fn multiple_categories_are_a_union() {
    let set = explore_set();
    let mut criteria = FilterCriteria::default();
    criteria.categories.insert("sushi".to_owned());
    criteria.categories.insert("Cafe".to_owned());
    assert_eq!(ids(&filter_and_sort(&set, &criteria)), vec![2, 4]);
}

#[test]
fn availability_filter_keeps_members_only() {
    let set = explore_set();
    let mut criteria = FilterCriteria::default();
    criteria.availability.insert(Availability::Now);
    assert_eq!(ids(&filter_and_sort(&set, &criteria)), vec![5, 4, 8]);
}

#[test]
fn availability_filter_drops_listings_without_availability() {
    let mut set = bakery_and_sushi();
    set[0].kind = ListingKind::Store;
    set[0].availability = None;
    let mut criteria = FilterCriteria::default();
    criteria.availability.insert(Availability::Today);
    assert_eq!(ids(&filter_and_sort(&set, &criteria)), vec![2]);
}

#[test]
fn explore_preset_applies_distance_and_discount() {
    let set = explore_set();
    let result = filter_and_sort(&set, &FilterCriteria::explore());
    assert_eq!(ids(&result), vec![3, 5, 1, 6, 2, 4, 7, 8]);

    let mut narrow = FilterCriteria::explore();
    narrow.max_distance_km = 1.0;
    narrow.min_discount_percent = 55;
    assert_eq!(ids(&filter_and_sort(&set, &narrow)), vec![3, 6]);
}

// -----------------------------------------------------------------------
// Sorting
// -----------------------------------------------------------------------

#[test]
fn sort_by_discount_descending_keeps_fetch_order_on_ties() {
    let set = explore_set();
    let criteria = FilterCriteria {
        sort_key: SortKey::Discount,
        ..FilterCriteria::default()
    };
    assert_eq!(
        ids(&filter_and_sort(&set, &criteria)),
        vec![7, 4, 2, 8, 3, 6, 1, 5]
    );
}

#[test]
fn sort_by_rating_descending_keeps_fetch_order_on_ties() {
    let set = explore_set();
    let criteria = FilterCriteria {
        sort_key: SortKey::Rating,
        ..FilterCriteria::default()
    };
    assert_eq!(
        ids(&filter_and_sort(&set, &criteria)),
        vec![4, 1, 8, 3, 7, 5, 2, 6]
    );
}

#[test]
fn sort_puts_missing_metrics_last() {
    let mut set = bakery_and_sushi();
    set.insert(0, listing(9, "Corner Grocer", 40, 0.1, "Grocery"));
    set[0].distance_km = None;
    set[0].discount_percent = None;

    let by_distance = filter_and_sort(&set, &FilterCriteria::default());
    assert_eq!(ids(&by_distance), vec![1, 2, 9]);

    let by_discount = FilterCriteria {
        sort_key: SortKey::Discount,
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_and_sort(&set, &by_discount)), vec![2, 1, 9]);
}

#[test]
fn missing_distance_and_discount_are_never_filtered_on() {
    let mut set = bakery_and_sushi();
    set[0].distance_km = None;
    set[0].discount_percent = None;
    let criteria = FilterCriteria {
        max_distance_km: 0.1,
        min_discount_percent: 90,
        ..FilterCriteria::default()
    };
    assert_eq!(ids(&filter_and_sort(&set, &criteria)), vec![1]);
}

// -----------------------------------------------------------------------
// Properties
// -----------------------------------------------------------------------

#[test]
fn empty_input_yields_empty_output() {
    assert!(filter_and_sort(&[], &FilterCriteria::explore()).is_empty());
}

#[test]
fn default_criteria_only_sorts_by_distance() {
    let mut set = explore_set();
    // Include a tie so stability is observable.
    set.push(listing(10, "Second Pasta", 10, 0.5, "Restaurant"));
    let result = filter_and_sort(&set, &FilterCriteria::default());

    let mut expected = set.clone();
    expected.sort_by(|a, b| a.distance_km.unwrap().total_cmp(&b.distance_km.unwrap()));
    assert_eq!(result, expected);
    assert_eq!(&ids(&result)[..2], &[3_i64, 10]);
}

#[test]
fn empty_sets_are_noops() {
    let set = explore_set();
    let base = FilterCriteria {
        query: "a".to_owned(),
        max_distance_km: 2.0,
        ..FilterCriteria::default()
    };
    let mut toggled = base.clone();
    toggle(&mut toggled.categories, "cafe".to_owned());
    toggle(&mut toggled.categories, "cafe".to_owned());
    toggle(&mut toggled.availability, Availability::Now);
    toggle(&mut toggled.availability, Availability::Now);
    assert_eq!(filter_and_sort(&set, &base), filter_and_sort(&set, &toggled));
}

#[test]
fn filtering_twice_is_a_fixed_point() {
    let set = explore_set();
    let mut criteria = FilterCriteria::explore();
    criteria.sort_key = SortKey::Rating;
    criteria.categories.insert("restaurant".to_owned());
    let once = filter_and_sort(&set, &criteria);
    let twice = filter_and_sort(&once, &criteria);
    assert_eq!(once, twice);
}

#[test]
fn raising_min_discount_never_grows_results() {
    let set = explore_set();
    let mut previous = usize::MAX;
    for min in (0..=100).step_by(5) {
        let criteria = FilterCriteria {
            min_discount_percent: min,
            ..FilterCriteria::default()
        };
        let len = filter_and_sort(&set, &criteria).len();
        assert!(len <= previous, "min_discount {min} grew results");
        previous = len;
    }
}

#[test]
fn raising_max_distance_never_shrinks_results() {
    let set = explore_set();
    let mut previous = 0;
    for step in 0..=20 {
        let criteria = FilterCriteria {
            max_distance_km: f64::from(step) * 0.25,
            ..FilterCriteria::default()
        };
        let len = filter_and_sort(&set, &criteria).len();
        assert!(len >= previous, "max_distance step {step} shrank results");
        previous = len;
    }
}

#[test]
fn toggle_twice_restores_set() {
    let mut set: BTreeSet<String> = ["bakery", "cafe"].iter().map(|s| (*s).to_owned()).collect();
    let original = set.clone();
    toggle(&mut set, "vegan".to_owned());
    assert!(set.contains("vegan"));
    toggle(&mut set, "vegan".to_owned());
    assert_eq!(set, original);

    toggle(&mut set, "cafe".to_owned());
    assert!(!set.contains("cafe"));
    toggle(&mut set, "cafe".to_owned());
    assert_eq!(set, original);
}

// -----------------------------------------------------------------------
// FilterState
// -----------------------------------------------------------------------

#[test]
fn filter_state_toggles_and_resets_to_baseline() {
    let mut state = FilterState::new(FilterCriteria::explore());
    state.toggle_category("bakery");
    state.toggle_availability(Availability::Now);
    state.criteria_mut().query = "treats".to_owned();
    state.criteria_mut().sort_key = SortKey::Rating;
    state.criteria_mut().max_distance_km = 10.0;
    assert!(state.is_modified());

    state.reset();
    assert!(!state.is_modified());
    assert_eq!(state.criteria(), &FilterCriteria::explore());
}

#[test]
fn filter_state_apply_uses_current_criteria() {
    let mut state = FilterState::default();
    state.toggle_category("fast food");
    assert_eq!(ids(&state.apply(&explore_set())), vec![5, 6]);
}

#[test]
fn sort_key_parses_and_displays() {
    assert_eq!("Rating".parse::<SortKey>(), Ok(SortKey::Rating));
    assert_eq!(SortKey::Discount.to_string(), "discount");
    assert!("price".parse::<SortKey>().is_err());
}
