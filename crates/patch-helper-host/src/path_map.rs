/// A matched prefix and the component name it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch<'a> {
    pub prefix: &'a str,
    pub name: &'a str,
}

impl PathMatch<'_> {
    /// The part of `path` below the matched prefix.
    #[must_use]
    pub fn remainder<'p>(&self, path: &'p str) -> &'p str {
        path.strip_prefix(self.prefix).unwrap_or(path)
    }
}

/// Directory prefix to component name mapping (modules or libraries).
///
/// Prefixes are kept sorted ascending and always end with `/`. Lookups try the
/// deepest prefix first so nested components win over their parents.
#[derive(Debug, Clone, Default)]
pub struct PathMap {
    entries: Vec<(String, String)>,
    most_specific_order: Vec<usize>,
}

fn calculate_prefix_depth(prefix: &str) -> usize {
    prefix.split('/').filter(|part| !part.is_empty()).count()
}

impl PathMap {
    pub fn new<I, P, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, N)>,
        P: Into<String>,
        N: Into<String>,
    {
        let mut entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(prefix, name)| {
                let mut prefix: String = prefix.into();
                if !prefix.ends_with('/') {
                    prefix.push('/');
                }
                (prefix, name.into())
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|later, earlier| later.0 == earlier.0);

        let mut most_specific_order: Vec<usize> = (0..entries.len()).collect();
        most_specific_order.sort_by(|&a, &b| {
            calculate_prefix_depth(&entries[b].0).cmp(&calculate_prefix_depth(&entries[a].0))
        });

        Self {
            entries,
            most_specific_order,
        }
    }

    /// Entries in ascending prefix order.
    pub fn iter(&self) -> impl Iterator<Item = PathMatch<'_>> {
        self.entries.iter().map(|(prefix, name)| PathMatch { prefix, name })
    }

    /// Entries ordered deepest prefix first.
    pub fn most_specific_first(&self) -> impl Iterator<Item = PathMatch<'_>> {
        self.most_specific_order.iter().map(|&index| {
            let (prefix, name) = &self.entries[index];
            PathMatch { prefix, name }
        })
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<PathMatch<'_>> {
        self.most_specific_first()
            .find(|candidate| path.starts_with(candidate.prefix))
    }

    #[must_use]
    pub fn prefix_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry_name)| entry_name == name)
            .map(|(prefix, _)| prefix.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
