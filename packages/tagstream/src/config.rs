use crate::ids::{GlobalIds, IdSource, SequentialIds};
use tagstream_dom::EscapeMode;

/// How a build assigns ids and escapes content.
///
/// ```rust
/// use tagstream::{BuildConfig, IdStrategy};
///
/// let config = BuildConfig::default()
///     .with_id_prefix("signup-")
///     .with_id_strategy(IdStrategy::Global);
/// assert_eq!(config.id_prefix, "signup-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct BuildConfig {
    /// Prepended to the counter of every generated id
    pub id_prefix: String,
    pub id_strategy: IdStrategy,
    /// Escaping applied to text and attribute values
    pub escape: EscapeMode,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            id_prefix: "id".to_string(),
            id_strategy: IdStrategy::default(),
            escape: EscapeMode::default(),
        }
    }
}

impl BuildConfig {
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    pub(crate) fn id_source(&self) -> Box<dyn IdSource> {
        match self.id_strategy {
            IdStrategy::PerBuild => Box::new(SequentialIds::new(self.id_prefix.clone())),
            IdStrategy::Global => Box::new(GlobalIds::new(self.id_prefix.clone())),
        }
    }
}

/// Which counter generated ids come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum IdStrategy {
    /// A fresh counter for every build. Builds are deterministic, but ids from two builds can collide.
    #[default]
    PerBuild,

    /// One counter for the whole process, see [`crate::GlobalIds`].
    Global,
}
