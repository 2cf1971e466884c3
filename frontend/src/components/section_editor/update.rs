//! Update function for the section editor component.
//!
//! Receives the editor state, the `Context`, and a `Msg`, applies it to the
//! draft, and returns whether the view should re-render. Network calls run
//! in `spawn_local` and report back with a follow-up message; the draft is
//! never borrowed across an `.await`.

use common::draft::{DraftError, FieldPath, SaveOutcome, SaveStart};
use serde_json::Value;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{confirm, read_data_uri, set_window_dirty_flag, show_toast};
use super::messages::Msg;
use super::state::SectionEditor;
use crate::components::preview::CallbackRenderer;

pub fn update(component: &mut SectionEditor, ctx: &Context<SectionEditor>, msg: Msg) -> bool {
    let render = match msg {
        Msg::SetTab(tab) => {
            component.active_tab = tab;
            true
        }
        Msg::SetField(path, value) => match component.manager.set_str(&path, value) {
            Ok(changed) => changed,
            Err(err) => report(err),
        },
        Msg::EditIdentifier(identifier) => {
            component.identifier_input = identifier;
            true
        }
        Msg::CommitIdentifier => {
            commit_identifier(component);
            true
        }
        Msg::AddItem { list, record } => {
            match FieldPath::parse(&list).map_err(DraftError::from).and_then(|list| {
                component.manager.append_item(&list, record)
            }) {
                Ok(_) => true,
                Err(err) => report(err),
            }
        }
        Msg::RemoveItem { list, id } => {
            match FieldPath::parse(&list)
                .map_err(DraftError::from)
                .and_then(|list| component.manager.remove_item(&list, &id))
            {
                Ok(removed) => removed,
                Err(err) => report(err),
            }
        }
        Msg::MoveItem { list, id, direction } => {
            match FieldPath::parse(&list)
                .map_err(DraftError::from)
                .and_then(|list| component.manager.move_item(&list, &id, direction))
            {
                Ok(moved) => moved,
                Err(err) => report(err),
            }
        }
        Msg::FileSelected { path, file } => {
            let link = ctx.link().clone();
            spawn_local(async move {
                match read_data_uri(file).await {
                    Ok(uri) => link.send_message(Msg::SetField(path, Value::String(uri))),
                    Err(err) => show_toast(&format!("Could not read the image: {err}")),
                }
            });
            false
        }
        Msg::Save => save(component, ctx),
        Msg::SaveCompleted(pending, result) => {
            match component.manager.complete_save(pending, result) {
                Ok(_) => show_toast("Configuration saved."),
                // The draft moved on; its own save reports separately.
                Err(DraftError::StaleResponse) => {}
                Err(DraftError::Sync(err)) if err.is_retryable() => {
                    show_toast(&format!("Save failed, your changes are kept. {err}"))
                }
                Err(err) => show_toast(&format!("Save failed: {err}")),
            }
            true
        }
        Msg::Publish => {
            let mut renderer = CallbackRenderer {
                on_publish: ctx.props().on_publish.clone(),
            };
            match component.manager.publish(&mut renderer) {
                Ok(()) => show_toast("Published to your layout."),
                Err(err) => show_toast(&err.to_string()),
            }
            true
        }
        Msg::Reset => {
            if !confirm("Discard this configuration and delete the saved copy?") {
                return false;
            }
            let pending = component.manager.begin_reset();
            ctx.props().on_reset.emit(ctx.props().kind);
            match pending {
                Some(pending) => {
                    component.resetting = true;
                    let sync = component.manager.synchronizer().clone();
                    let backend = component.backend;
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let result = sync.delete(&backend, pending.kind, &pending.record_id).await;
                        link.send_message(Msg::ResetCompleted(result));
                    });
                }
                None => show_toast("Configuration reset."),
            }
            true
        }
        Msg::ResetCompleted(result) => {
            component.resetting = false;
            match result {
                Ok(()) => show_toast("Configuration reset."),
                Err(err) => {
                    log::warn!("remote delete after reset failed: {err}");
                    show_toast(&format!(
                        "Reset locally, but the saved copy could not be deleted: {err}"
                    ));
                }
            }
            true
        }
        Msg::LoadRemote { announce } => {
            commit_identifier(component);
            let identifier = component.manager.identifier().to_string();
            if identifier.is_empty() {
                show_toast(&format!("Enter a {} first.", component.manager.schema().identifier_label));
                return true;
            }
            component.loading_remote = true;
            let backend = component.backend;
            let kind = ctx.props().kind;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = backend.find(kind, &identifier).await;
                link.send_message(Msg::RemoteLoaded { result, announce });
            });
            true
        }
        Msg::RemoteLoaded { result, announce } => {
            component.loading_remote = false;
            match result {
                Ok(Some(record)) => {
                    if component.manager.is_dirty()
                        && !confirm("Replace your unsaved changes with the saved configuration?")
                    {
                        return true;
                    }
                    component.manager.hydrate_from_record(record);
                    component.identifier_input = component.manager.identifier().to_string();
                    show_toast("Saved configuration loaded.");
                }
                Ok(None) if announce => show_toast("Nothing saved under this name yet."),
                Ok(None) => {}
                Err(err) if announce => show_toast(&format!("Could not load: {err}")),
                Err(err) => log::warn!("initial load failed: {err}"),
            }
            true
        }
    };
    set_window_dirty_flag(component.manager.is_dirty());
    render
}

fn save(component: &mut SectionEditor, ctx: &Context<SectionEditor>) -> bool {
    commit_identifier(component);
    match component.manager.begin_save() {
        Ok(SaveStart::Unchanged(SaveOutcome::AlreadySaved { .. })) => {
            show_toast("Already saved, nothing changed.");
            false
        }
        Ok(SaveStart::Unchanged(_)) => false,
        Ok(SaveStart::Pending(pending)) => {
            let sync = component.manager.synchronizer().clone();
            let backend = component.backend;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = sync
                    .send(&backend, pending.record_id.as_deref(), &pending.request)
                    .await;
                link.send_message(Msg::SaveCompleted(pending, result));
            });
            true
        }
        Err(err) => report(err),
    }
}

fn commit_identifier(component: &mut SectionEditor) {
    if let Err(err) = component.manager.rename(&component.identifier_input) {
        show_toast(&format!("Wait for the save to finish before renaming. {err}"));
    }
    component.identifier_input = component.manager.identifier().to_string();
}

fn report(err: DraftError) -> bool {
    log::warn!("{err}");
    show_toast(&err.to_string());
    true
}
