//! Read-only rendering of a section configuration.
//!
//! Used for the live preview tab of the editor and for the "Your Layout"
//! page. Fields are decoded into the typed models from `common::model`;
//! a configuration that no longer decodes falls back to the defaults so a
//! half-edited draft never blanks the preview.

use common::draft::publish::Renderer;
use common::model::carousel::CarouselConfig;
use common::model::footer::FooterConfig;
use common::model::navbar::{NavbarComponent, NavbarComponentType, NavbarConfig, NavbarTheme, Position};
use common::model::newsletter::NewsletterConfig;
use common::model::section::SectionKind;
use common::model::team::TeamConfig;
use common::model::testimonial::TestimonialsConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use yew::prelude::*;

/// A section handed over by the publish gate.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedSection {
    pub kind: SectionKind,
    pub identifier: String,
    pub fields: Value,
}

/// Forwards published sections to a Yew callback.
pub struct CallbackRenderer {
    pub on_publish: Callback<PublishedSection>,
}

impl Renderer for CallbackRenderer {
    fn render(&mut self, kind: SectionKind, identifier: &str, fields: &Value) {
        self.on_publish.emit(PublishedSection {
            kind,
            identifier: identifier.to_string(),
            fields: fields.clone(),
        });
    }
}

pub fn render_section(kind: SectionKind, fields: &Value) -> Html {
    match kind {
        SectionKind::Navbar => navbar(&decode(kind, fields)),
        SectionKind::Footer => footer(&decode(kind, fields)),
        SectionKind::Carousel => carousel(&decode(kind, fields)),
        SectionKind::Testimonials => testimonials(&decode(kind, fields)),
        SectionKind::Team => team(&decode(kind, fields)),
        SectionKind::Newsletter => newsletter(&decode(kind, fields)),
    }
}

fn decode<T: DeserializeOwned + Default>(kind: SectionKind, fields: &Value) -> T {
    serde_json::from_value(fields.clone()).unwrap_or_else(|err| {
        log::warn!("{kind} preview falls back to defaults: {err}");
        T::default()
    })
}

fn image(src: &str, alt: &str, class: &'static str) -> Html {
    if src.is_empty() {
        return html! {};
    }
    html! { <img class={class} src={src.to_string()} alt={alt.to_string()} /> }
}

fn navbar(config: &NavbarConfig) -> Html {
    let dark = config.theme == NavbarTheme::Dark;
    let style = format!(
        "background:{};width:{};height:{};color:{}",
        config.color,
        config.size.width,
        config.size.height,
        if dark { "#fff" } else { "#222" }
    );
    let slot = |position: Position| {
        let mut components: Vec<&NavbarComponent> = config
            .components
            .iter()
            .filter(|c| c.position == position)
            .collect();
        components.sort_by_key(|c| c.sequence);
        html! {
            <div class={classes!("navbar-slot", position.as_str())}>
                { for components.into_iter().map(navbar_component) }
            </div>
        }
    };
    html! {
        <nav class="preview-navbar" style={style}>
            { for Position::ALL.into_iter().map(slot) }
        </nav>
    }
}

fn navbar_component(component: &NavbarComponent) -> Html {
    let config = &component.config;
    match component.component_type {
        NavbarComponentType::Logo => image(
            config.src.as_deref().unwrap_or_default(),
            config.alt.as_deref().unwrap_or("Logo"),
            "navbar-logo",
        ),
        NavbarComponentType::MenuLinks => html! {
            <ul class="navbar-links">
                { for config.links.iter().map(|link| html! {
                    <li><a href={link.path.clone()}>{ &link.label }</a></li>
                }) }
            </ul>
        },
        NavbarComponentType::SearchBar => html! {
            <input class="navbar-search" placeholder={config.placeholder.clone().unwrap_or_default()} disabled=true />
        },
        NavbarComponentType::CartIcon => html! {
            <span class="navbar-cart">
                <i class="material-icons">{"shopping_cart"}</i>
                <span class="badge">{ config.count.unwrap_or(0) }</span>
            </span>
        },
        NavbarComponentType::ProfileIcon => html! {
            <span class="navbar-profile">{ config.initials.clone().unwrap_or_default() }</span>
        },
        NavbarComponentType::ThemeToggle => html! {
            <i class="material-icons">
                { if config.current_theme == Some(NavbarTheme::Dark) { "dark_mode" } else { "light_mode" } }
            </i>
        },
    }
}

fn footer(config: &FooterConfig) -> Html {
    let style = format!("background:{};color:{}", config.background_color, config.text_color);
    let columns = format!("gap:{}px", config.gap);
    html! {
        <footer class="preview-footer" style={style}>
            { image(&config.logo_url, &config.logo_alt, "footer-logo") }
            <div class="footer-columns" style={columns}>
                { for config.columns.iter().map(|column| html! {
                    <div class="footer-column">
                        <h4>{ &column.title }</h4>
                        { for column.links.iter().map(|link| html! {
                            <a href={link.href.clone()}>{ &link.label }</a>
                        }) }
                    </div>
                }) }
            </div>
            <div class="footer-social">
                { for config.social.iter().map(|social| html! {
                    <a href={social.href.clone()}>
                        { social.provider_label.clone().unwrap_or_else(|| social.provider.as_str().to_string()) }
                    </a>
                }) }
            </div>
            if config.show_newsletter {
                <div class="footer-newsletter">
                    <input placeholder="you@example.com" disabled=true />
                    <button disabled=true>{"Subscribe"}</button>
                </div>
            }
            <small>{ &config.copyright_text }</small>
        </footer>
    }
}

fn carousel(config: &CarouselConfig) -> Html {
    let style = format!("width:{};height:{}", config.size.width, config.size.height);
    html! {
        <div class="preview-carousel" style={style} title={config.style.label()}>
            { for config.slides.iter().map(|slide| {
                let background = if slide.image.is_empty() {
                    String::new()
                } else {
                    format!("background-image:url('{}')", slide.image)
                };
                html! {
                    <div class={classes!("slide", slide.dark_overlay.then_some("dark"))} style={background}>
                        <h3>{ &slide.title }</h3>
                        <p>{ &slide.subtitle }</p>
                        if !slide.cta_text.is_empty() {
                            <a class="cta" href={slide.cta_href.clone()}>{ &slide.cta_text }</a>
                        }
                    </div>
                }
            }) }
        </div>
    }
}

fn testimonials(config: &TestimonialsConfig) -> Html {
    html! {
        <section class={classes!("preview-testimonials", config.preset.clone())}>
            { for config.items.iter().filter(|item| item.is_active).map(|item| {
                let stars = "★".repeat(usize::from(item.rating.unwrap_or(0)));
                html! {
                    <blockquote class="testimonial">
                        { image(&item.image, &item.name, "avatar") }
                        <p>{ &item.text }</p>
                        <span class="stars">{ stars }</span>
                        <cite>{ format!("{}, {} {}", item.name, item.position, item.company) }</cite>
                    </blockquote>
                }
            }) }
        </section>
    }
}

fn team(config: &TeamConfig) -> Html {
    html! {
        <section class="preview-team">
            <h2>{ &config.heading }</h2>
            <p>{ &config.subheading }</p>
            <div class="team-grid">
                { for config.members.iter().map(|member| html! {
                    <div class="member">
                        { image(&member.avatar_url, &member.name, "avatar") }
                        <strong>{ &member.name }</strong>
                        <span>{ &member.role }</span>
                        <p>{ &member.bio }</p>
                    </div>
                }) }
            </div>
        </section>
    }
}

fn newsletter(config: &NewsletterConfig) -> Html {
    let mut style = format!("background-color:{}", config.bg_color);
    if !config.bg_image.is_empty() {
        style.push_str(&format!(";background-image:url('{}')", config.bg_image));
    }
    html! {
        <section class={classes!("preview-newsletter", config.style.clone())} style={style}>
            if !config.pill_text.is_empty() {
                <span class="pill">{ &config.pill_text }</span>
            }
            <h2>{ &config.headline }</h2>
            <p>{ &config.subheading }</p>
            <button disabled=true>{ &config.button_label }</button>
            if config.show_privacy {
                <small>{"We respect your privacy."}</small>
            }
            { image(&config.illustration_url, "", "illustration") }
        </section>
    }
}
