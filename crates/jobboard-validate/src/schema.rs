//! # Constraint Tables
//!
//! A [`Schema`] is the static constraint table of one request type: an
//! ordered list of fields, each with a wire name, an accessor that reads the
//! field out of a record, and the rules declared for it. Request types
//! implement [`Validate`] to hand their table to the validator.
//!
//! ```ignore
//! impl Validate for ApplyRequest {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<ApplyRequest>> = Lazy::new(|| {
//!             Schema::<ApplyRequest>::builder()
//!                 .field("job_id", |r| r.job_id.as_str().into(), [Rule::Required, Rule::Uuid])
//!                 .field("cover_letter", |r| r.cover_letter.as_str().into(), [Rule::Required, Rule::MinLen(50)])
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//! ```

use uuid::Uuid;

use crate::messages::to_snake_case;
use crate::rule::Rule;

/// A borrowed view of one field's value, as rules see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A string.
    Text(&'a str),
    /// An identifier.
    Id(Uuid),
    /// A boolean.
    Flag(bool),
    /// A list of strings.
    List(&'a [String]),
    /// An absent optional field.
    Missing,
}

impl FieldValue<'_> {
    /// Whether the value is absent or the zero value of its type: the empty
    /// string, the nil UUID, `false` or the empty list.
    pub fn is_default(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Id(id) => id.is_nil(),
            Self::Flag(b) => !b,
            Self::List(items) => items.is_empty(),
            Self::Missing => true,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl From<Uuid> for FieldValue<'_> {
    fn from(value: Uuid) -> Self {
        Self::Id(value)
    }
}

impl From<Option<Uuid>> for FieldValue<'_> {
    fn from(value: Option<Uuid>) -> Self {
        value.map_or(Self::Missing, Self::Id)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Option<bool>> for FieldValue<'_> {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Missing, Self::Flag)
    }
}

impl<'a> From<&'a [String]> for FieldValue<'a> {
    fn from(value: &'a [String]) -> Self {
        Self::List(value)
    }
}

impl<'a> From<Option<&'a [String]>> for FieldValue<'a> {
    fn from(value: Option<&'a [String]>) -> Self {
        value.map_or(Self::Missing, Self::List)
    }
}

/// Reads one field out of a record.
pub type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// One row of a constraint table.
pub struct FieldSpec<T> {
    name: String,
    accessor: Accessor<T>,
    rules: Vec<Rule>,
}

impl<T> FieldSpec<T> {
    /// Wire name of the field, in snake_case.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared rules, in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Read this field out of `record`.
    pub fn read<'a>(&self, record: &'a T) -> FieldValue<'a> {
        (self.accessor)(record)
    }
}

impl<T> std::fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .finish()
    }
}

/// The constraint table of a request type.
#[derive(Debug)]
pub struct Schema<T> {
    fields: Vec<FieldSpec<T>>,
}

impl<T> Schema<T> {
    /// Start declaring a table.
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    /// Look up a field by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether any field carries a role rule.
    pub fn has_role_rules(&self) -> bool {
        self.fields
            .iter()
            .flat_map(|f| f.rules.iter())
            .any(Rule::is_role_rule)
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder<T> {
    fields: Vec<FieldSpec<T>>,
}

impl<T> SchemaBuilder<T> {
    /// Declare a field. `name` is normalized to snake_case; rules run in the
    /// order given.
    pub fn field(
        mut self,
        name: &str,
        accessor: Accessor<T>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: to_snake_case(name),
            accessor,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Finish the table.
    pub fn build(self) -> Schema<T> {
        Schema {
            fields: self.fields,
        }
    }
}

/// A request type with a declared constraint table.
pub trait Validate: Sized + 'static {
    /// The table, built once.
    fn schema() -> &'static Schema<Self>;
}
