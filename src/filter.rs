//! Activity-type derivation and route filtering
//!
//! Read-only views over a finished batch for the rendering side: which
//! activity types are present, how to label them, and which records to show.

use crate::types::{CanonicalRoute, NormalizedBatch};

/// Activity types hidden from the map unless explicitly re-enabled
pub const DEFAULT_EXCLUDED_ACTIVITIES: &[&str] = &["IN_SUBWAY"];

impl NormalizedBatch {
    /// Distinct non-empty activity types, in the order routes first use them
    pub fn activity_types(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for activity in self.routes.iter().filter_map(|r| r.activity_type.as_deref()) {
            if !activity.is_empty() && !seen.iter().any(|s| s == activity) {
                seen.push(activity.to_string());
            }
        }
        seen
    }
}

/// Human-readable label for an activity tag.
///
/// `IN_PASSENGER_VEHICLE` becomes `In Passenger Vehicle`; a missing tag is
/// `Unknown`.
pub fn activity_label(activity: Option<&str>) -> String {
    let Some(activity) = activity else {
        return "Unknown".to_string();
    };

    activity
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Which routes the viewer asked for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActivitySelection {
    #[default]
    All,
    Only(String),
}

impl ActivitySelection {
    /// `"all"` (any case) selects everything
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            ActivitySelection::All
        } else {
            ActivitySelection::Only(value.to_string())
        }
    }
}

/// Display filter applied to a batch before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFilter {
    pub activity: ActivitySelection,
    pub excluded: Vec<String>,
    pub show_place_visits: bool,
}

impl Default for RouteFilter {
    fn default() -> Self {
        Self {
            activity: ActivitySelection::All,
            excluded: DEFAULT_EXCLUDED_ACTIVITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            show_place_visits: true,
        }
    }
}

impl RouteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activity(mut self, activity: ActivitySelection) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Add exclusions on top of the current list, skipping duplicates
    pub fn also_excluding(mut self, extra: impl IntoIterator<Item = String>) -> Self {
        for activity in extra {
            if !self.is_excluded(&activity) {
                self.excluded.push(activity);
            }
        }
        self
    }

    pub fn with_place_visits(mut self, show: bool) -> Self {
        self.show_place_visits = show;
        self
    }

    fn is_excluded(&self, activity: &str) -> bool {
        self.excluded.iter().any(|e| e == activity)
    }

    /// Whether a route should be drawn
    pub fn matches(&self, route: &CanonicalRoute) -> bool {
        let activity = route.activity_type.as_deref();
        if activity.is_some_and(|a| self.is_excluded(a)) {
            return false;
        }
        match &self.activity {
            ActivitySelection::All => true,
            ActivitySelection::Only(wanted) => activity == Some(wanted.as_str()),
        }
    }

    /// Filtered copy of the batch; order is preserved
    pub fn apply(&self, batch: &NormalizedBatch) -> NormalizedBatch {
        NormalizedBatch {
            routes: batch
                .routes
                .iter()
                .filter(|r| self.matches(r))
                .cloned()
                .collect(),
            place_visits: if self.show_place_visits {
                batch.place_visits.clone()
            } else {
                Vec::new()
            },
        }
    }

    /// Activity types offered for selection (present types minus exclusions)
    pub fn visible_activity_types(&self, batch: &NormalizedBatch) -> Vec<String> {
        batch
            .activity_types()
            .into_iter()
            .filter(|a| !self.is_excluded(a))
            .collect()
    }
}
