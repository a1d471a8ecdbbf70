use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use sitestack_core::utils::Redact;
use std::fmt::{Debug, Display, Formatter};

/// One exported stack value.
///
/// Secret values stay accessible through [`OutputValue::value`] for callers
/// that deliberately ask for them; Debug, Display and serialization always
/// redact them.
#[derive(Clone, PartialEq, Eq)]
pub struct OutputValue {
    name: String,
    value: String,
    secret: bool,
}

impl OutputValue {
    /// A plain exported value.
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            secret: false,
        }
    }

    /// A secret exported value.
    pub fn secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            secret: true,
        }
    }

    /// Export name of the value.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw value, secret or not.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value is marked secret.
    pub fn is_secret(&self) -> bool {
        self.secret
    }
}

impl Debug for OutputValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("OutputValue");
        s.field("name", &self.name);
        if self.secret {
            s.field("value", &Redact::from(self.value.as_str()));
        } else {
            s.field("value", &self.value);
        }
        s.field("secret", &self.secret).finish()
    }
}

impl Display for OutputValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.secret {
            write!(f, "{}: [secret]", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.value)
        }
    }
}

impl Serialize for OutputValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("OutputValue", 3)?;
        s.serialize_field("name", &self.name)?;
        if self.secret {
            s.serialize_field("value", "[secret]")?;
        } else {
            s.serialize_field("value", &self.value)?;
        }
        s.serialize_field("secret", &self.secret)?;
        s.end()
    }
}

/// The exported values of one deployment, in export order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StackOutputs {
    values: Vec<OutputValue>,
}

impl StackOutputs {
    /// Outputs from a list of values.
    pub fn new(values: Vec<OutputValue>) -> Self {
        Self { values }
    }

    /// Look up an exported value by name.
    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// All exported values, in export order.
    pub fn values(&self) -> &[OutputValue] {
        &self.values
    }
}

impl Display for StackOutputs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for value in &self.values {
            writeln!(f, "{value}")?;
        }
        Ok(())
    }
}
