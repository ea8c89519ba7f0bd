pub(crate) mod header;
pub(crate) mod layout;
pub(crate) mod portal_router;
pub(crate) mod registration_validation;
