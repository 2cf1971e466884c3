//! Properties of the [`SectionEditor`](super::SectionEditor).

use common::model::section::SectionKind;
use yew::prelude::*;

use crate::components::preview::PublishedSection;

#[derive(Properties, PartialEq, Clone)]
pub struct SectionEditorProps {
    /// Which section this editor works on. The editor picks the schema, the
    /// defaults and the last edited draft of this kind on mount; give it a
    /// `key` so switching kinds mounts a fresh editor.
    pub kind: SectionKind,

    /// Receives the fields of the section every time it is published.
    pub on_publish: Callback<PublishedSection>,

    /// Told when the draft was reset, so any published copy can be dropped.
    #[prop_or_default]
    pub on_reset: Callback<SectionKind>,
}
