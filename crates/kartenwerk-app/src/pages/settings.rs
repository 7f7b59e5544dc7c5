// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — card text, identifiers, and the cosmetic style knobs.
//
// Style changes affect subsequent exports only; the identifier prefix
// applies from the next session (the current session's id is already
// generated).

use dioxus::prelude::*;

use kartenwerk_core::types::{Palette, PhotoFrame};

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let config = svc.config();
    let mut institution = use_signal(|| config.institution_name.clone());
    let mut card_title = use_signal(|| config.card_title.clone());
    let mut id_prefix = use_signal(|| config.id_prefix.clone());
    let mut filename_prefix = use_signal(|| config.filename_prefix.clone());
    let mut photo_frame = use_signal(|| config.style.photo_frame);
    let mut palette_name = use_signal(|| palette_label(&config.style.palette).to_string());
    let mut show_watermark = use_signal(|| config.style.show_watermark);
    let mut watermark_text = use_signal(|| config.style.watermark_text.clone());
    let mut footer_text = use_signal(|| config.style.footer_text.clone().unwrap_or_default());
    let mut status_msg = use_signal(|| Option::<String>::None);

    let frame_value = frame_label(*photo_frame.read());

    rsx! {
        div { style: "max-width: 500px; margin: 0 auto;",
            h1 { "Settings" }

            h3 { "Card text" }
            SettingInput { label: "Institution name", value: institution, oninput: move |v| institution.set(v) }
            SettingInput { label: "Card title", value: card_title, oninput: move |v| card_title.set(v) }

            h3 { "Identifiers" }
            SettingInput { label: "ID prefix (next session)", value: id_prefix, oninput: move |v| id_prefix.set(v) }
            SettingInput { label: "Filename prefix", value: filename_prefix, oninput: move |v| filename_prefix.set(v) }

            h3 { "Style" }
            div { style: "margin-bottom: 12px;",
                label { style: "display: block; font-size: 14px; font-weight: bold; margin-bottom: 4px;",
                    "Photo frame"
                }
                select {
                    style: "width: 100%; padding: 10px; font-size: 16px; border: 2px solid #ccc; border-radius: 8px;",
                    value: "{frame_value}",
                    onchange: move |evt| {
                        photo_frame.set(match evt.value().as_str() {
                            "square" => PhotoFrame::Square,
                            "circle" => PhotoFrame::Circle,
                            _ => PhotoFrame::Rounded,
                        });
                    },
                    option { value: "rounded", "Rounded rectangle" }
                    option { value: "square", "Square" }
                    option { value: "circle", "Circle" }
                }
            }

            div { style: "margin-bottom: 12px;",
                label { style: "display: block; font-size: 14px; font-weight: bold; margin-bottom: 4px;",
                    "Palette"
                }
                select {
                    style: "width: 100%; padding: 10px; font-size: 16px; border: 2px solid #ccc; border-radius: 8px;",
                    value: "{palette_name}",
                    onchange: move |evt| palette_name.set(evt.value().to_string()),
                    option { value: "classic", "Classic blue" }
                    option { value: "slate", "Slate" }
                }
            }

            div { style: "display: flex; align-items: center; gap: 8px; margin-bottom: 12px;",
                input {
                    r#type: "checkbox",
                    checked: *show_watermark.read(),
                    onchange: move |evt| show_watermark.set(evt.checked()),
                }
                label { "Show watermark" }
            }
            SettingInput { label: "Watermark text", value: watermark_text, oninput: move |v| watermark_text.set(v) }
            SettingInput { label: "Footer text (optional)", value: footer_text, oninput: move |v| footer_text.set(v) }

            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: none; background: #2575fc; color: white; font-size: 18px; font-weight: bold; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let mut config = svc.config();
                        config.institution_name = institution.read().trim().to_string();
                        config.card_title = card_title.read().trim().to_string();
                        config.id_prefix = id_prefix.read().trim().to_string();
                        config.filename_prefix = filename_prefix.read().trim().to_string();
                        config.style.photo_frame = *photo_frame.read();
                        config.style.palette = match palette_name.read().as_str() {
                            "slate" => Palette::slate(),
                            _ => Palette::classic_blue(),
                        };
                        config.style.show_watermark = *show_watermark.read();
                        config.style.watermark_text = watermark_text.read().trim().to_string();
                        let footer = footer_text.read().trim().to_string();
                        config.style.footer_text = (!footer.is_empty()).then_some(footer);

                        match svc.save_config(&config) {
                            Ok(()) => {
                                state.write().config = config;
                                status_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "saving settings failed");
                                status_msg.set(Some(format!("Could not save settings: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }

            if let Some(ref msg) = *status_msg.read() {
                p { style: "margin-top: 12px; padding: 12px; border-radius: 8px; background: #f0f0f0; color: #333; font-size: 14px; text-align: center;",
                    "{msg}"
                }
            }
        }
    }
}

fn palette_label(palette: &Palette) -> &'static str {
    if *palette == Palette::slate() {
        "slate"
    } else {
        "classic"
    }
}

fn frame_label(frame: PhotoFrame) -> &'static str {
    match frame {
        PhotoFrame::Rounded => "rounded",
        PhotoFrame::Square => "square",
        PhotoFrame::Circle => "circle",
    }
}

#[component]
fn SettingInput(label: &'static str, value: Signal<String>, oninput: EventHandler<String>) -> Element {
    rsx! {
        div { style: "margin-bottom: 12px;",
            label { style: "display: block; font-size: 14px; font-weight: bold; margin-bottom: 4px;",
                "{label}"
            }
            input {
                r#type: "text",
                value: "{value}",
                style: "width: 100%; padding: 12px; font-size: 16px; border: 2px solid #ccc; border-radius: 8px; box-sizing: border-box;",
                oninput: move |evt| oninput.call(evt.value().to_string()),
            }
        }
    }
}
