//! Section editor: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! One editor serves every section kind. The form is generated from the
//! kind's `SectionSchema`, and every edit goes through the `DraftManager`,
//! which mirrors the draft to local storage, tracks whether it differs from
//! the last save and gates publishing.
//!
//! On first render a draft that was not restored from local storage is
//! looked up on the backend by its identifier.

use yew::prelude::*;

mod fields;
mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use common::draft::DraftState;
use helpers::{set_window_dirty_flag, show_toast};
pub use messages::Msg;
pub use props::SectionEditorProps;
pub use state::SectionEditor;

impl Component for SectionEditor {
    type Message = Msg;
    type Properties = SectionEditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        SectionEditor::new(ctx.props().kind)
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            set_window_dirty_flag(self.manager.is_dirty());

            match self.manager.state() {
                DraftState::Empty if !self.manager.identifier().is_empty() => {
                    ctx.link().send_message(Msg::LoadRemote { announce: false });
                }
                DraftState::Empty => {}
                _ => show_toast(&format!(
                    "Restored your {} draft \"{}\".",
                    ctx.props().kind.label(),
                    self.manager.identifier()
                )),
            }
        }
    }
}
