use crate::{
    record::{Privileges, Record},
    value::Value,
};
use tracing::debug;

impl Record {
    /// Compare against another record or a mapping. Any failure while
    /// building the comparison container counts as "not equal".
    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Record(record) => self == record.as_ref(),
            Value::Map(entries) => self.eq_mapping(entries),
            _ => false,
        }
    }

    // the container is built with elevated privilege, so forged readonly
    // values must be caught by comparing the readonly subsets as well
    pub(crate) fn eq_mapping(&self, entries: &[(Value, Value)]) -> bool {
        let container =
            match Self::build(self.ty.clone(), Value::Map(entries.to_vec()), Privileges::ELEVATED) {
                Ok(container) => container,
                Err(err) => {
                    debug!(
                        type_name = self.type_name(),
                        error = %err,
                        "mapping is not comparable to record"
                    );
                    return false;
                }
            };

        self.full_attributes() == container.full_attributes()
            && self.readonly_attributes() == container.readonly_attributes()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ty.is_same(&other.ty) && self.full_attributes() == other.full_attributes()
    }
}
