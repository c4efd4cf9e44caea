use std::fmt;

use indexmap::IndexMap;

/// Key of a script table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScriptKey {
    /// `t[3]`
    Index(i64),
    /// `t.name` or `t["name"]`
    Name(String),
}

impl fmt::Display for ScriptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptKey::Index(i) => write!(f, "{}", i),
            ScriptKey::Name(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ScriptKey {
    fn from(name: &str) -> Self {
        ScriptKey::Name(name.to_owned())
    }
}

impl From<String> for ScriptKey {
    fn from(name: String) -> Self {
        ScriptKey::Name(name)
    }
}

impl From<i64> for ScriptKey {
    fn from(i: i64) -> Self {
        ScriptKey::Index(i)
    }
}

impl From<i32> for ScriptKey {
    fn from(i: i32) -> Self {
        ScriptKey::Index(i as i64)
    }
}

impl From<u32> for ScriptKey {
    fn from(i: u32) -> Self {
        ScriptKey::Index(i as i64)
    }
}

impl From<usize> for ScriptKey {
    fn from(i: usize) -> Self {
        ScriptKey::Index(i as i64)
    }
}

/// A value held by a script variable or table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    /// `nil`; assigning it removes a table entry
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// Number literal without a fraction or exponent
    Integer(i64),
    /// Any other number literal
    Number(f64),
    /// String literal
    Str(String),
    /// Table constructor or `{}`
    Table(ScriptTable),
}

impl ScriptValue {
    /// The table, if this is one.
    pub fn as_table(&self) -> Option<&ScriptTable> {
        match self {
            ScriptValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable access to the table, if this is one.
    pub fn as_table_mut(&mut self) -> Option<&mut ScriptTable> {
        match self {
            ScriptValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integral numbers, including floats without a fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            ScriptValue::Integer(i) => Some(i),
            ScriptValue::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(n as i64),
            _ => None,
        }
    }

    /// Lua type name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Nil => "nil",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Integer(_) | ScriptValue::Number(_) => "number",
            ScriptValue::Str(_) => "string",
            ScriptValue::Table(_) => "table",
        }
    }
}

/// Ordered key/value table. Entries keep their first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptTable {
    entries: IndexMap<ScriptKey, ScriptValue>,
}

impl ScriptTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored at `key`.
    pub fn get(&self, key: &ScriptKey) -> Option<&ScriptValue> {
        self.entries.get(key)
    }

    /// Mutable value stored at `key`.
    pub fn get_mut(&mut self, key: &ScriptKey) -> Option<&mut ScriptValue> {
        self.entries.get_mut(key)
    }

    /// Sets `key` to `value`; assigning `Nil` removes the entry.
    pub fn insert(&mut self, key: ScriptKey, value: ScriptValue) {
        match value {
            ScriptValue::Nil => {
                self.entries.shift_remove(&key);
            }
            value => {
                self.entries.insert(key, value);
            }
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ScriptKey> {
        self.entries.keys()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ScriptKey, &ScriptValue)> {
        self.entries.iter()
    }

    /// Values at keys `1..=n` while they are contiguous.
    pub fn sequence(&self) -> Vec<&ScriptValue> {
        let mut out = Vec::new();
        let mut i = 1i64;
        while let Some(v) = self.get(&ScriptKey::Index(i)) {
            out.push(v);
            i += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_and_nil_removes() {
        let mut t = ScriptTable::new();
        t.insert("a".into(), ScriptValue::Integer(1));
        t.insert(2i64.into(), ScriptValue::Str("x".into()));
        t.insert("a".into(), ScriptValue::Integer(5));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(&"a".into()), Some(&ScriptValue::Integer(5)));

        t.insert("a".into(), ScriptValue::Nil);
        assert_eq!(t.len(), 1);
        assert_eq!(t.keys().collect::<Vec<_>>(), [&ScriptKey::Index(2)]);
    }

    #[test]
    fn sequence_stops_at_first_gap() {
        let mut t = ScriptTable::new();
        for i in [1i64, 2, 4] {
            t.insert(i.into(), ScriptValue::Integer(i * 10));
        }
        let seq: Vec<_> = t.sequence().iter().filter_map(|v| v.as_integer()).collect();
        assert_eq!(seq, [10, 20]);
    }

    #[test]
    fn large_tables_keep_insertion_order() {
        let mut t = ScriptTable::new();
        for i in (0..20_000i64).rev() {
            t.insert(i.into(), ScriptValue::Integer(i));
        }
        t.insert(19_999i64.into(), ScriptValue::Integer(-1));
        t.insert(10_000i64.into(), ScriptValue::Nil);

        assert_eq!(t.len(), 19_999);
        assert_eq!(t.get(&19_999i64.into()), Some(&ScriptValue::Integer(-1)));
        assert_eq!(t.get(&10_000i64.into()), None);
        let head: Vec<_> = t.keys().take(2).cloned().collect();
        assert_eq!(head, [ScriptKey::Index(19_999), ScriptKey::Index(19_998)]);
        assert_eq!(t.keys().last(), Some(&ScriptKey::Index(0)));
    }

    #[test]
    fn index_and_name_keys_differ() {
        assert_ne!(ScriptKey::from(3i64), ScriptKey::from("3"));
    }
}
