use std::ops::{Deref, DerefMut};

use serde_json::json;

use crate::{
    core::msg::{view::ViewUpdate, Msg},
    error::ViewError,
    presentation::{
        components::{page_callback, Component, PaginationControls},
        views::StatefulView,
    },
};

pub const PREV_ID: &str = "paginated_prev";
pub const INDICATOR_ID: &str = "paginated_indicator";
pub const NEXT_ID: &str = "paginated_next";

/// A view showing one page of text at a time
///
/// Navigation records the new zero-based page as the `page` prop of the
/// view.
#[derive(Debug)]
pub struct PaginatedView {
    view: StatefulView,
    pages: Vec<String>,
    controls: PaginationControls,
}

impl PaginatedView {
    pub fn new(mut view: StatefulView, pages: Vec<String>) -> Result<Self, ViewError> {
        let handle = view.handle().clone();
        let controls = PaginationControls::new(
            pages.len(),
            0,
            Some(page_callback(move |interaction, page| {
                let handle = handle.clone();
                async move {
                    interaction.defer();
                    let update = ViewUpdate::default().prop("page", json!(page));
                    handle.dispatch(Msg::view_updated(handle.id(), update)).await;
                    Ok(())
                }
            })),
        )
        .with_custom_ids(PREV_ID, INDICATOR_ID, NEXT_ID);
        controls.add_to_view(&mut view)?;

        Ok(Self {
            view,
            pages,
            controls,
        })
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn current_page(&self) -> usize {
        self.controls.current_page()
    }

    /// Text of the current page, `None` when there are no pages
    pub fn current_content(&self) -> Option<&str> {
        self.pages.get(self.current_page()).map(String::as_str)
    }

    pub fn controls(&self) -> &PaginationControls {
        &self.controls
    }
}

impl Deref for PaginatedView {
    type Target = StatefulView;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

impl DerefMut for PaginatedView {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.view
    }
}
