//! Contract between the sync controller and whatever draws the list.

use shared::{
    domain::{Item, ItemId, Owner},
    error::ApiError,
};

/// Owner name shown for an item whose owner is not among the loaded owners.
pub const UNKNOWN_OWNER_PLACEHOLDER: &str = "unknown owner";

pub trait Presentation {
    fn render_item(&mut self, item: &Item, owner_name: &str);
    fn render_owner_option(&mut self, owner: &Owner);
    fn remove_rendered(&mut self, item_id: &ItemId);
    /// Puts the rendered checkbox back to `completed` after a toggle the service refused.
    fn set_rendered_completed(&mut self, item_id: &ItemId, completed: bool);
    fn notify_error(&mut self, error: &ApiError);
}
