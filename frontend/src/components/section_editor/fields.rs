//! Form controls generated from a section schema.
//!
//! Each [`FieldSpec`] becomes one control bound to its field path. List
//! fields render one card per item, addressed by the item's id so that
//! reordering never sends an edit to the wrong item.

use common::draft::asset::{classify, AssetValue};
use common::draft::{Direction, FieldPath};
use common::model::schema::{FieldKind, FieldSpec, ItemTemplate};
use serde_json::Value;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::SectionEditor;

/// Renders `specs`. With `item = Some((path, value))` the specs are relative
/// to that list item and only the keys the item actually has are shown.
pub fn field_list(
    component: &SectionEditor,
    link: &Scope<SectionEditor>,
    item: Option<(&str, &Value)>,
    specs: &[FieldSpec],
) -> Html {
    html! {
        <div class="field-list">
            { for specs.iter().filter_map(|spec| {
                let path = match item {
                    Some((base, value)) => {
                        if !has_key(value, spec.path) {
                            return None;
                        }
                        format!("{base}.{}", spec.path)
                    }
                    None => spec.path.to_string(),
                };
                Some(field(component, link, spec, path))
            }) }
        </div>
    }
}

fn field(component: &SectionEditor, link: &Scope<SectionEditor>, spec: &FieldSpec, path: String) -> Html {
    let value = FieldPath::parse(&path)
        .ok()
        .and_then(|p| component.manager.get(&p))
        .unwrap_or(&Value::Null);

    let control = match spec.kind {
        FieldKind::Text => text_input(link, path, value),
        FieldKind::LongText => {
            let oninput = link.callback(move |e: InputEvent| {
                let text = e.target_unchecked_into::<HtmlTextAreaElement>().value();
                Msg::SetField(path.clone(), Value::String(text))
            });
            html! { <textarea value={as_text(value)} {oninput} rows="3" /> }
        }
        FieldKind::Color => {
            let swatch = match as_text(value) {
                color if color.len() == 7 => color,
                _ => "#000000".to_string(),
            };
            let picker_path = path.clone();
            let oninput = link.callback(move |e: InputEvent| {
                let color = e.target_unchecked_into::<HtmlInputElement>().value();
                Msg::SetField(picker_path.clone(), Value::String(color))
            });
            html! {
                <span class="color-field">
                    <input type="color" value={swatch} {oninput} />
                    { text_input(link, path, value) }
                </span>
            }
        }
        FieldKind::Toggle => {
            let onchange = link.callback(move |e: Event| {
                let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
                Msg::SetField(path.clone(), Value::Bool(checked))
            });
            html! { <input type="checkbox" checked={value.as_bool().unwrap_or(false)} {onchange} /> }
        }
        FieldKind::Number { min, max } => {
            let oninput = link.batch_callback(move |e: InputEvent| {
                let raw = e.target_unchecked_into::<HtmlInputElement>().value();
                let raw = raw.trim();
                if raw.is_empty() {
                    return Some(Msg::SetField(path.clone(), Value::Null));
                }
                raw.parse::<i64>()
                    .ok()
                    .map(|n| Msg::SetField(path.clone(), Value::from(n)))
            });
            let shown = value.as_i64().map(|n| n.to_string()).unwrap_or_default();
            html! {
                <input type="number" min={min.to_string()} max={max.to_string()} value={shown} {oninput} />
            }
        }
        FieldKind::Image => image_input(link, path, value),
        FieldKind::Choice(options) => {
            let current = as_text(value);
            let onchange = link.callback(move |e: Event| {
                let choice = e.target_unchecked_into::<HtmlSelectElement>().value();
                Msg::SetField(path.clone(), Value::String(choice))
            });
            html! {
                <select {onchange}>
                    { for options.iter().map(|option| html! {
                        <option value={*option} selected={current == *option}>{ *option }</option>
                    }) }
                </select>
            }
        }
        FieldKind::List { item_fields, item_label, templates } => {
            return list(component, link, spec, path, value, item_fields, item_label, templates);
        }
    };

    html! {
        <label class="field">
            <span class="field-label">{ spec.label }</span>
            { control }
        </label>
    }
}

fn text_input(link: &Scope<SectionEditor>, path: String, value: &Value) -> Html {
    let oninput = link.callback(move |e: InputEvent| {
        let text = e.target_unchecked_into::<HtmlInputElement>().value();
        Msg::SetField(path.clone(), Value::String(text))
    });
    html! { <input type="text" value={as_text(value)} {oninput} /> }
}

fn image_input(link: &Scope<SectionEditor>, path: String, value: &Value) -> Html {
    let current = as_text(value);
    let (url, note) = match classify(&current) {
        AssetValue::Empty => (String::new(), None),
        AssetValue::Inline { .. } => (String::new(), Some("Uploaded, stored on next save")),
        AssetValue::Remote(url) => (url.to_string(), None),
        AssetValue::Unresolved(raw) => (raw.to_string(), Some("Not a usable image URL")),
    };

    let file_path = path.clone();
    let onchange = link.batch_callback(move |e: Event| {
        let input = e.target_unchecked_into::<HtmlInputElement>();
        let file = input.files().and_then(|files| files.get(0));
        input.set_value("");
        file.map(|file| Msg::FileSelected { path: file_path.clone(), file })
    });
    let clear_path = path.clone();
    let onclear = link.callback(move |_: MouseEvent| Msg::SetField(clear_path.clone(), Value::String(String::new())));

    html! {
        <span class="image-field">
            if !current.is_empty() {
                <img class="thumbnail" src={current.clone()} alt="" />
            }
            { text_input(link, path, &Value::String(url)) }
            <input type="file" accept="image/*" {onchange} />
            if !current.is_empty() {
                <button class="icon-btn small" onclick={onclear} title="Remove image">
                    <i class="material-icons">{"delete"}</i>
                </button>
            }
            if let Some(note) = note {
                <small class="field-note">{ note }</small>
            }
        </span>
    }
}

#[allow(clippy::too_many_arguments)]
fn list(
    component: &SectionEditor,
    link: &Scope<SectionEditor>,
    spec: &FieldSpec,
    path: String,
    value: &Value,
    item_fields: &[FieldSpec],
    item_label: &str,
    templates: &[ItemTemplate],
) -> Html {
    let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
    let last = items.len().saturating_sub(1);

    html! {
        <fieldset class="list-field">
            <legend>{ format!("{} ({})", spec.label, items.len()) }</legend>
            { for items.iter().enumerate().filter_map(|(index, item)| {
                let id = item.get("id").and_then(Value::as_str)?.to_string();
                let item_path = format!("{path}[#{id}]");
                let title = item
                    .get(item_label)
                    .and_then(Value::as_str)
                    .filter(|title| !title.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Item {}", index + 1));
                Some(html! {
                    <div class="item-card" key={id.clone()}>
                        <div class="item-header">
                            <strong>{ title }</strong>
                            { item_button(link, "arrow_upward", index == 0, Msg::MoveItem {
                                list: path.clone(), id: id.clone(), direction: Direction::Up,
                            }) }
                            { item_button(link, "arrow_downward", index == last, Msg::MoveItem {
                                list: path.clone(), id: id.clone(), direction: Direction::Down,
                            }) }
                            { item_button(link, "delete", false, Msg::RemoveItem {
                                list: path.clone(), id: id.clone(),
                            }) }
                        </div>
                        { field_list(component, link, Some((item_path.as_str(), item)), item_fields) }
                    </div>
                })
            }) }
            <div class="list-actions">
                { for templates.iter().map(|template| {
                    let list = path.clone();
                    let build = template.build;
                    let onclick = link.callback(move |_: MouseEvent| Msg::AddItem { list: list.clone(), record: build() });
                    html! {
                        <button class="add-btn" {onclick}>
                            <i class="material-icons">{"add"}</i>
                            { template.label }
                        </button>
                    }
                }) }
            </div>
        </fieldset>
    }
}

fn item_button(link: &Scope<SectionEditor>, icon: &'static str, disabled: bool, msg: Msg) -> Html {
    let onclick = link.callback(move |_: MouseEvent| msg.clone());
    html! {
        <button class="icon-btn small" {onclick} {disabled}>
            <i class="material-icons">{ icon }</i>
        </button>
    }
}

fn has_key(item: &Value, relative: &str) -> bool {
    item.pointer(&format!("/{}", relative.replace('.', "/"))).is_some()
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
