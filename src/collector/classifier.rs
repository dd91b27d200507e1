//! Column classification
//!
//! Maps each result column to exactly one role. A column listed under more
//! than one role takes the first role in priority order:
//! tag > int > float > bool, and anything unlisted is a string field.

use std::fmt;

use serde::{Serialize, Serializer};

use super::row::FieldKind;

/// Role a result column plays in the emitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Tag,
    Field(FieldKind),
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Tag => "tag",
            ColumnRole::Field(kind) => kind.as_str(),
        }
    }
}

impl Serialize for ColumnRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-supplied column-name lists, one per explicit role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoleConfig {
    tag_names: Vec<String>,
    int_names: Vec<String>,
    float_names: Vec<String>,
    bool_names: Vec<String>,
}

/// A column name present in more than one role list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOverlap {
    pub column: String,
    /// Role the classifier assigns
    pub winner: ColumnRole,
    /// Lower-priority roles that are ignored for this column
    pub shadowed: Vec<ColumnRole>,
}

impl ColumnRoleConfig {
    pub fn new(
        tag_names: Vec<String>,
        int_names: Vec<String>,
        float_names: Vec<String>,
        bool_names: Vec<String>,
    ) -> Self {
        Self {
            tag_names,
            int_names,
            float_names,
            bool_names,
        }
    }

    pub fn with_tags<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.tag_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ints<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.int_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_floats<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.float_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bools<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.bool_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Membership lists in priority order
    fn rules(&self) -> [(&[String], ColumnRole); 4] {
        [
            (self.tag_names.as_slice(), ColumnRole::Tag),
            (self.int_names.as_slice(), ColumnRole::Field(FieldKind::Int)),
            (self.float_names.as_slice(), ColumnRole::Field(FieldKind::Float)),
            (self.bool_names.as_slice(), ColumnRole::Field(FieldKind::Bool)),
        ]
    }

    fn matching_roles<'a>(&'a self, column: &'a str) -> impl Iterator<Item = ColumnRole> + 'a {
        self.rules()
            .into_iter()
            .filter(move |(names, _)| names.iter().any(|n| n == column))
            .map(|(_, role)| role)
    }

    /// Role of a single column name
    pub fn resolve(&self, column: &str) -> ColumnRole {
        self.matching_roles(column)
            .next()
            .unwrap_or(ColumnRole::Field(FieldKind::String))
    }

    /// Names listed under more than one role, in first-listed order
    pub fn overlaps(&self) -> Vec<RoleOverlap> {
        let mut seen: Vec<&str> = Vec::new();
        let mut overlaps = Vec::new();

        for (names, _) in self.rules() {
            for name in names {
                if seen.contains(&name.as_str()) {
                    continue;
                }
                seen.push(name);

                let roles: Vec<ColumnRole> = self.matching_roles(name).collect();
                if let Some((winner, shadowed)) = roles.split_first() {
                    if !shadowed.is_empty() {
                        overlaps.push(RoleOverlap {
                            column: name.clone(),
                            winner: *winner,
                            shadowed: shadowed.to_vec(),
                        });
                    }
                }
            }
        }

        overlaps
    }
}

/// Column indices grouped by role, each group in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoleIndex {
    pub tags: Vec<usize>,
    pub int_fields: Vec<usize>,
    pub float_fields: Vec<usize>,
    pub bool_fields: Vec<usize>,
    pub string_fields: Vec<usize>,
}

impl ColumnRoleIndex {
    fn push(&mut self, role: ColumnRole, idx: usize) {
        let group = match role {
            ColumnRole::Tag => &mut self.tags,
            ColumnRole::Field(FieldKind::Int) => &mut self.int_fields,
            ColumnRole::Field(FieldKind::Float) => &mut self.float_fields,
            ColumnRole::Field(FieldKind::Bool) => &mut self.bool_fields,
            ColumnRole::Field(FieldKind::String) => &mut self.string_fields,
        };
        group.push(idx);
    }

    /// Indices assigned to `role`
    pub fn group(&self, role: ColumnRole) -> &[usize] {
        match role {
            ColumnRole::Tag => self.tags.as_slice(),
            ColumnRole::Field(FieldKind::Int) => &self.int_fields,
            ColumnRole::Field(FieldKind::Float) => &self.float_fields,
            ColumnRole::Field(FieldKind::Bool) => &self.bool_fields,
            ColumnRole::Field(FieldKind::String) => &self.string_fields,
        }
    }

    /// Field groups in decode order
    pub fn field_groups(&self) -> [(FieldKind, &[usize]); 4] {
        [
            (FieldKind::Int, self.int_fields.as_slice()),
            (FieldKind::Float, self.float_fields.as_slice()),
            (FieldKind::Bool, self.bool_fields.as_slice()),
            (FieldKind::String, self.string_fields.as_slice()),
        ]
    }

    /// Total number of classified columns
    pub fn len(&self) -> usize {
        self.tags.len()
            + self.int_fields.len()
            + self.float_fields.len()
            + self.bool_fields.len()
            + self.string_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `columns` into role groups.
///
/// Every index in `0..columns.len()` lands in exactly one group.
pub fn classify<S: AsRef<str>>(columns: &[S], roles: &ColumnRoleConfig) -> ColumnRoleIndex {
    let mut index = ColumnRoleIndex::default();
    for (idx, column) in columns.iter().enumerate() {
        index.push(roles.resolve(column.as_ref()), idx);
    }
    index
}
