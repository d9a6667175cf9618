use serde::{Deserialize, Serialize};

/// Ordered classification of a match's confidence, higher is better.
///
/// The discriminants are part of the contract: categories inherit the
/// highest type among their matches, and the sort stage compares types
/// numerically before it ever looks at relevance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// Placeholder for a provider that produced nothing useful.
    #[default]
    None = 0,
    /// Completion of the typed query rather than an answer to it.
    Completion = 10,
    /// The provider believes this could be what was asked for.
    Possible = 30,
    /// An informational answer shown for context, not for launching.
    Informational = 50,
    /// A helper entry contributed alongside another provider's results.
    Helper = 70,
    /// The provider is confident this is exactly what was asked for.
    Exact = 100,
}

/// A secondary action offered by a match, invoked through the owning
/// provider via its position in the action list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAction {
    pub id: String,
    pub label: String,
    pub icon: String,
}

impl MatchAction {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
        }
    }

    /// Attach an icon name to the action.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// One search result produced by a provider.
///
/// The `text` field is the display text and doubles as the key for
/// duplicate detection in the final list. Matches are plain data; running
/// one, or one of its actions, is routed back to the provider identified
/// by `provider_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub id: String,
    pub provider_id: String,
    pub text: String,
    pub subtext: String,
    pub icon: String,
    pub category: String,
    pub match_type: MatchType,
    pub relevance: f64,
    pub enabled: bool,
    pub multi_line: bool,
    pub actions: Vec<MatchAction>,
}

impl SearchMatch {
    /// Create a match with the mandatory identity fields; everything else
    /// starts at its neutral default (`enabled`, single line, no actions).
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            text: text.into(),
            subtext: String::new(),
            icon: String::new(),
            category: String::new(),
            match_type: MatchType::None,
            relevance: 0.0,
            enabled: true,
            multi_line: false,
            actions: Vec::new(),
        }
    }

    /// Set the category label the match is grouped under.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the supplementary line of text shown under the display text.
    #[must_use]
    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = subtext.into();
        self
    }

    /// Set the icon name.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the match type used for ranking.
    #[must_use]
    pub fn with_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Set the provider-assigned relevance score, higher is better.
    #[must_use]
    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = relevance;
        self
    }

    /// Mark the match as disabled for invocation.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Allow the display text to render across multiple lines.
    #[must_use]
    pub fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }

    /// Replace the secondary action list.
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<MatchAction>) -> Self {
        self.actions = actions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_replace_fields() {
        let action = MatchAction::new("open", "Open").with_icon("document-open");
        let result = SearchMatch::new("m1", "apps", "Calculator")
            .with_category("Applications")
            .with_subtext("Scientific calculator")
            .with_icon("accessories-calculator")
            .with_type(MatchType::Exact)
            .with_relevance(0.9)
            .with_actions(vec![action.clone()])
            .multi_line();

        assert_eq!(result.id, "m1");
        assert_eq!(result.provider_id, "apps");
        assert_eq!(result.category, "Applications");
        assert_eq!(result.match_type, MatchType::Exact);
        assert!(result.enabled);
        assert!(result.multi_line);
        assert_eq!(result.actions, vec![action]);
    }

    #[test]
    fn match_types_order_by_confidence() {
        assert!(MatchType::None < MatchType::Completion);
        assert!(MatchType::Completion < MatchType::Possible);
        assert!(MatchType::Possible < MatchType::Informational);
        assert!(MatchType::Informational < MatchType::Helper);
        assert!(MatchType::Helper < MatchType::Exact);
    }
}
