use super::{Account, AccountFields, FieldValue, MapperError, ACCOUNT_FIELDS};
use crate::notion::{Page, PropertyMap};

/// Page → account. Total: absent, empty or falsy properties take the field default.
pub fn decode(page: &Page) -> Account {
    let mut account = Account::with_defaults(page.id.clone());
    for spec in ACCOUNT_FIELDS.iter() {
        if let Some(value) = spec.kind.extract(page.properties.get(spec.property)) {
            if let Err(e) = account.set(spec.field, value) {
                tracing::warn!(page = %page.id, property = spec.property, error = %e, "keeping default");
            }
        }
    }
    account
}

/// Account fields → property payload for create and update.
///
/// Every property is always written. A missing `lastPost` encodes as an
/// explicit null date, so an update without it clears the stored value.
pub fn encode(fields: &AccountFields) -> Result<PropertyMap, MapperError> {
    let mut properties = PropertyMap::new();
    for spec in ACCOUNT_FIELDS.iter() {
        let value = match fields.get(spec.field) {
            Some(value) if !(spec.fill_on_write && value.is_falsy()) => value,
            _ if spec.fill_on_write => spec.default.value(),
            _ => FieldValue::Null,
        };
        properties.insert(spec.property.to_string(), spec.kind.encode(spec.field, value)?);
    }
    Ok(properties)
}
