/// One navigation step: a sequence of nested keys applied in order to
/// descend through a JSON object (`obj[k1][k2]...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    keys: Vec<String>,
}

impl KeyPath {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// An ordered list of key-paths describing how to descend from a raw
/// REData response to its terminal series objects.
///
/// Lists encountered at any level during navigation are flattened
/// transparently; the route only names object keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    steps: Vec<KeyPath>,
}

impl Route {
    pub fn new(steps: Vec<KeyPath>) -> Self {
        Self { steps }
    }

    /// Builds a route from nested key slices, e.g.
    /// `Route::from_keys(&[&["included"], &["attributes", "content"]])`.
    pub fn from_keys(steps: &[&[&str]]) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|keys| KeyPath::new(keys.iter().copied()))
                .collect(),
        }
    }

    pub fn steps(&self) -> &[KeyPath] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
