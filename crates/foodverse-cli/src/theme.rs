//! Store customization commands backed by the local settings file.

use clap::{Subcommand, ValueEnum};
use foodverse_core::theme::resolve;
use foodverse_core::{Layout, SettingsPatch, StoreCustomization, Theme};

use crate::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Colorful,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Colorful => Theme::Colorful,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Grid,
    List,
    Carousel,
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Grid => Layout::Grid,
            LayoutArg::List => Layout::List,
            LayoutArg::Carousel => Layout::Carousel,
        }
    }
}

/// Sub-commands available under `theme`.
#[derive(Debug, Subcommand)]
pub enum ThemeCommands {
    /// Show the current customization and the theme it resolves to
    Show {
        /// Print the resolved theme as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change customization; unset flags keep their current value
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        /// Hex colour, e.g. #3b82f6
        #[arg(long)]
        primary_color: Option<String>,
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
        #[arg(long)]
        show_rating: Option<bool>,
        #[arg(long)]
        show_reviews: Option<bool>,
        #[arg(long)]
        auto_approve_orders: Option<bool>,
        #[arg(long)]
        notifications: Option<bool>,
    },
    /// Restore the default customization
    Reset,
}

/// Values from `theme set`, applied over the stored customization.
#[derive(Debug, Default)]
pub(crate) struct CustomizationChange {
    pub theme: Option<Theme>,
    pub primary_color: Option<String>,
    pub layout: Option<Layout>,
    pub show_rating: Option<bool>,
    pub show_reviews: Option<bool>,
    pub auto_approve_orders: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

impl CustomizationChange {
    pub(crate) fn apply(self, mut current: StoreCustomization) -> StoreCustomization {
        if let Some(theme) = self.theme {
            current.theme = theme;
        }
        if let Some(color) = self.primary_color {
            current.primary_color = color.trim().to_lowercase();
        }
        if let Some(layout) = self.layout {
            current.layout = layout;
        }
        if let Some(show) = self.show_rating {
            current.show_rating = show;
        }
        if let Some(show) = self.show_reviews {
            current.show_reviews = show;
        }
        if let Some(auto) = self.auto_approve_orders {
            current.auto_approve_orders = auto;
        }
        if let Some(enabled) = self.notifications_enabled {
            current.notifications_enabled = enabled;
        }
        current
    }
}

pub(crate) fn run(ctx: &Context, command: ThemeCommands) -> anyhow::Result<()> {
    match command {
        ThemeCommands::Show { json } => {
            let customization = ctx.settings.load()?.customization;
            show(&customization, json)
        }
        ThemeCommands::Set {
            theme,
            primary_color,
            layout,
            show_rating,
            show_reviews,
            auto_approve_orders,
            notifications,
        } => {
            let change = CustomizationChange {
                theme: theme.map(Theme::from),
                primary_color,
                layout: layout.map(Layout::from),
                show_rating,
                show_reviews,
                auto_approve_orders,
                notifications_enabled: notifications,
            };
            let updated = change.apply(ctx.settings.load()?.customization);
            // Refuse to store a colour the renderer cannot use.
            resolve(&updated)?;
            let saved = ctx.settings.save(SettingsPatch {
                customization: Some(updated),
                ..SettingsPatch::default()
            })?;
            println!("customization saved to {}", ctx.settings.path().display());
            show(&saved.customization, false)
        }
        ThemeCommands::Reset => {
            let saved = ctx.settings.save(SettingsPatch {
                customization: Some(StoreCustomization::default()),
                ..SettingsPatch::default()
            })?;
            println!("customization reset");
            show(&saved.customization, false)
        }
    }
}

fn show(customization: &StoreCustomization, json: bool) -> anyhow::Result<()> {
    let resolved = resolve(customization)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!(
        "theme:         {} (swatch {})",
        resolved.color_scheme,
        customization.theme.preview_color()
    );
    for (name, value) in &resolved.css_variables {
        println!("{name:<15}{value}");
    }
    println!("layout:        {:?}", resolved.layout);
    println!("show rating:   {}", resolved.show_rating);
    println!("show reviews:  {}", resolved.show_reviews);
    println!("auto approve:  {}", customization.auto_approve_orders);
    println!("notifications: {}", customization.notifications_enabled);
    println!("hours:");
    for (day, hours) in customization.hours_by_weekday() {
        if hours.is_open {
            println!("  {day:<10}{} - {}", hours.open, hours.close);
        } else {
            println!("  {day:<10}closed");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_keeps_unset_fields() {
        let current = StoreCustomization {
            show_reviews: false,
            ..StoreCustomization::default()
        };
        let updated = CustomizationChange {
            theme: Some(Theme::Dark),
            primary_color: Some(" #FDE047 ".to_string()),
            ..CustomizationChange::default()
        }
        .apply(current);

        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.primary_color, "#fde047");
        assert!(!updated.show_reviews);
        assert_eq!(updated.layout, Layout::Grid);
    }

    #[test]
    fn invalid_colour_fails_resolution() {
        let updated = CustomizationChange {
            primary_color: Some("blue".to_string()),
            ..CustomizationChange::default()
        }
        .apply(StoreCustomization::default());
        assert!(resolve(&updated).is_err());
    }
}
