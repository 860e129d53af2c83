// Events that flow from background fetch tasks to the UI loop
//
// Fetches run as spawned tasks and never touch UI state directly. They send
// one of these back over the app channel and the UI loop applies it in
// arrival order.

use crate::api::{BlogDetail, BlogPost, FetchError};
use crate::tui::popover::InstanceId;

#[derive(Debug)]
pub enum AppEvent {
    /// The post list finished loading
    ///
    /// `generation` identifies the load request; a reload bumps it so an
    /// older response cannot overwrite a newer one.
    ListLoaded {
        generation: u64,
        result: Result<Vec<BlogPost>, FetchError>,
    },

    /// A card's detail finished loading
    ///
    /// Routed by the card's popover instance; dropped if that card is gone.
    DetailLoaded {
        instance: InstanceId,
        post_id: String,
        result: Result<BlogDetail, FetchError>,
    },
}
