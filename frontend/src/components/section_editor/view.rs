//! View rendering for the section editor component.
//!
//! A header with the identifier input and the draft state, an icon toolbar
//! (save, publish, reset, load saved), and two tabs: the generated form and
//! a live preview of the draft.

use common::draft::DraftState;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::fields::field_list;
use super::helpers::state_label;
use super::messages::Msg;
use super::state::SectionEditor;
use crate::components::preview::render_section;

pub fn view(component: &SectionEditor, ctx: &Context<SectionEditor>) -> Html {
    let link = ctx.link();

    html! {
        <div class="section-editor">
            { build_header(component, ctx) }
            { build_toolbar(component, link) }
            { build_tab_bar(component, link) }
            {
                if component.active_tab == "editor" {
                    html! {
                        <div class="editor-pane">
                            { field_list(component, link, None, component.manager.schema().fields) }
                        </div>
                    }
                } else {
                    html! {
                        <div class="preview-pane">
                            { render_section(component.manager.kind(), &component.manager.published_fields()) }
                        </div>
                    }
                }
            }
        </div>
    }
}

fn build_header(component: &SectionEditor, ctx: &Context<SectionEditor>) -> Html {
    let link = ctx.link();
    let schema = component.manager.schema();
    let (state, class) = state_label(component.manager.state());
    let oninput = link.callback(|e: InputEvent| {
        Msg::EditIdentifier(e.target_unchecked_into::<HtmlInputElement>().value())
    });
    let onchange = link.callback(|_: Event| Msg::CommitIdentifier);

    html! {
        <div class="editor-header">
            <h2>{ ctx.props().kind.label() }</h2>
            <label class="identifier">
                <span>{ schema.identifier_label }</span>
                <input
                    type="text"
                    value={component.identifier_input.clone()}
                    disabled={component.manager.is_saving()}
                    {oninput}
                    {onchange}
                />
            </label>
            <span class={class}>{ state }</span>
            if let Some(record_id) = component.manager.record_id() {
                <small class="record-id" title="Saved record">{ record_id }</small>
            }
        </div>
    }
}

fn build_toolbar(component: &SectionEditor, link: &Scope<SectionEditor>) -> Html {
    let saving = component.manager.is_saving();
    let save_label = if saving { "Saving..." } else { "Save" };
    let publish_disabled = saving || !component.manager.can_publish();
    let published = component.manager.state() == DraftState::Published;

    html! {
        <div class="icon-toolbar">
            { icon_button("save", save_label, link.callback(|_| Msg::Save), saving) }
            { icon_button(
                "publish",
                if published { "Published" } else { "Publish" },
                link.callback(|_| Msg::Publish),
                publish_disabled,
            ) }
            { icon_button(
                "cloud_download",
                "Load saved",
                link.callback(|_| Msg::LoadRemote { announce: true }),
                saving || component.loading_remote,
            ) }
            { icon_button(
                "restart_alt",
                "Reset",
                link.callback(|_| Msg::Reset),
                saving || component.resetting,
            ) }
        </div>
    }
}

/// Builds the tab bar for switching between Editor and Preview.
/// Shows a red dot if there are unsaved changes.
fn build_tab_bar(component: &SectionEditor, link: &Scope<SectionEditor>) -> Html {
    let dirty = component.manager.is_dirty();
    let tab = |name: &'static str, label: &'static str| {
        html! {
            <button
                class={classes!("tab-btn", (component.active_tab == name).then_some("active"))}
                onclick={link.callback(move |_: MouseEvent| Msg::SetTab(name.to_string()))}
            >
                { label }
                if dirty && name == "editor" {
                    <span class="dirty-dot" title="Unsaved changes" />
                }
            </button>
        }
    };

    html! {
        <div class="tab-bar">
            { tab("editor", "Editor") }
            { tab("preview", "Preview") }
        </div>
    }
}

fn icon_button(icon_name: &str, label: &str, on_click: Callback<MouseEvent>, disabled: bool) -> Html {
    html! {
        <button class="icon-btn" onclick={on_click} {disabled}>
            <i class="material-icons">{ icon_name.to_string() }</i>
            <span class="icon-label">{ label.to_string() }</span>
        </button>
    }
}
