//! Request validation. Every failing field is reported, not just the first.

use super::{
    BookItemRequest, CreateItemRequest, CreateWishlistRequest, ItemData, UpdateItemRequest,
    UpdateWishlistRequest,
};
use crate::error::{Error, FieldError, Result};

pub const MAX_WISHLIST_TITLE_LENGTH: usize = 200;
pub const MAX_WISHLIST_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_ITEM_TYPE_LENGTH: usize = 50;
pub const MAX_ITEM_NAME_LENGTH: usize = 300;
pub const MAX_ITEM_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_BOOKER_NAME_LENGTH: usize = 100;
pub const MAX_BOOKING_MESSAGE_LENGTH: usize = 1000;

#[derive(Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    /// Lengths are counted in characters. A blank optional field passes.
    fn text(&mut self, field: &str, value: &str, max: usize, required: bool) {
        let message = if value.trim().is_empty() {
            required.then(|| "field is required and cannot be empty".to_string())
        } else if value.chars().count() > max {
            Some(format!("must not exceed {} characters", max))
        } else {
            None
        };

        if let Some(message) = message {
            self.errors.push(FieldError::new(field, message));
        }
    }

    fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.text(field, value, max, false);
        }
    }

    fn item_data(&mut self, data: &ItemData) {
        self.text("data.name", &data.name, MAX_ITEM_NAME_LENGTH, true);
        self.optional_text(
            "data.description",
            data.description.as_deref(),
            MAX_ITEM_DESCRIPTION_LENGTH,
        );
        if let Some(url) = data.url.as_deref() {
            if !is_http_url(url) {
                self.errors.push(FieldError::new(
                    "data.url",
                    "url must be a valid HTTP/HTTPS URL",
                ));
            }
        }
    }

    fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

pub fn validate_create_wishlist(req: &CreateWishlistRequest) -> Result<()> {
    let mut checks = Checks::default();
    checks.text("title", &req.title, MAX_WISHLIST_TITLE_LENGTH, true);
    checks.optional_text(
        "description",
        req.description.as_deref(),
        MAX_WISHLIST_DESCRIPTION_LENGTH,
    );
    checks.finish()
}

pub fn validate_update_wishlist(req: &UpdateWishlistRequest) -> Result<()> {
    let mut checks = Checks::default();
    if let Some(title) = req.title.as_deref() {
        checks.text("title", title, MAX_WISHLIST_TITLE_LENGTH, true);
    }
    checks.optional_text(
        "description",
        req.description.as_deref(),
        MAX_WISHLIST_DESCRIPTION_LENGTH,
    );
    checks.finish()
}

pub fn validate_create_item(req: &CreateItemRequest) -> Result<()> {
    let mut checks = Checks::default();
    checks.text("type", &req.r#type, MAX_ITEM_TYPE_LENGTH, true);
    checks.item_data(&req.data);
    checks.finish()
}

pub fn validate_update_item(req: &UpdateItemRequest) -> Result<()> {
    let mut checks = Checks::default();
    if let Some(kind) = req.r#type.as_deref() {
        checks.text("type", kind, MAX_ITEM_TYPE_LENGTH, true);
    }
    if let Some(data) = &req.data {
        checks.item_data(data);
    }
    checks.finish()
}

pub fn validate_booking(req: &BookItemRequest) -> Result<()> {
    let mut checks = Checks::default();
    checks.optional_text("bookerName", req.booker_name.as_deref(), MAX_BOOKER_NAME_LENGTH);
    checks.optional_text("message", req.message.as_deref(), MAX_BOOKING_MESSAGE_LENGTH);
    checks.finish()
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}
