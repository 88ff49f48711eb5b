use std::collections::HashMap;

/// Result of walking a key through the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Walk {
    /// Rule index stored at the key, if the key is a complete rule input.
    pub value: Option<usize>,
    /// Whether longer rule inputs continue past the key.
    pub has_children: bool,
}

impl Walk {
    const MISS: Walk = Walk {
        value: None,
        has_children: false,
    };
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<char, Node>,
    value: Option<usize>,
}

/// Character trie from rule input to an index into the rule vector.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleTrie {
    root: Node,
}

impl RuleTrie {
    /// Insert `key`, returning the index previously stored there.
    pub fn insert(&mut self, key: impl IntoIterator<Item = char>, value: usize) -> Option<usize> {
        let mut node = &mut self.root;
        for c in key {
            node = node.children.entry(c).or_default();
        }
        node.value.replace(value)
    }

    pub fn walk(&self, key: impl IntoIterator<Item = char>) -> Walk {
        match self.find(key) {
            Some(node) => Walk {
                value: node.value,
                has_children: !node.children.is_empty(),
            },
            None => Walk::MISS,
        }
    }

    /// Every value stored at `prefix` or below it.
    pub fn descendants(&self, prefix: impl IntoIterator<Item = char>) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut stack = vec![node];
            while let Some(n) = stack.pop() {
                out.extend(n.value);
                stack.extend(n.children.values());
            }
        }
        out.sort_unstable();
        out
    }

    fn find(&self, key: impl IntoIterator<Item = char>) -> Option<&Node> {
        let mut node = &self.root;
        for c in key {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}
