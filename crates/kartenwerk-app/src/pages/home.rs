// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Home page — the card form, photo box, capture surface, preview, and
// download action.
//
// On desktop the photo arrives via the native file dialog or drag-and-drop;
// the camera button goes through the platform bridge and degrades to an
// error message where no backend exists.

use base64::Engine as _;
use dioxus::prelude::*;

use kartenwerk_core::error::KartenwerkError;
use kartenwerk_core::human_errors::humanize_error;

use crate::services::app_services::AppServices;
use crate::services::session::FormFields;
use crate::state::{
    AppState, CameraViewState, DownloadFlash, DragFeedback, PhotoViewState, SubmitFlash,
};

fn photo_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

fn report_error(mut state: Signal<AppState>, err: &KartenwerkError) {
    let human = humanize_error(err);
    tracing::warn!(error = %err, "user-facing failure");
    state.write().status_message = Some(format!("{} {}", human.message, human.suggestion));
}

fn attach_photo_bytes(svc: &AppServices, mut state: Signal<AppState>, bytes: &[u8]) {
    match svc.accept_photo_bytes(bytes) {
        Ok(photo) => {
            let mut st = state.write();
            st.photo_src = Some(photo_data_uri(&photo.png));
            st.photo_view = PhotoViewState::HasPhoto;
            st.status_message = None;
        }
        Err(err) => report_error(state, &err),
    }
}

#[component]
pub fn Home() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let mut first_name = use_signal(String::new);
    let mut middle_name = use_signal(String::new);
    let mut last_name = use_signal(String::new);
    let mut date_of_birth = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut address = use_signal(String::new);

    let today = chrono::Local::now().date_naive().to_string();
    let drag_border = state.read().drag.border_color();
    let drag_shadow = state.read().drag.box_shadow();
    let submit_label = state.read().submit_flash.label();
    let download_label = state.read().download_flash.label();
    let card_title = state.read().config.card_title.clone();

    rsx! {
        div { style: "max-width: 560px; margin: 0 auto;",
            h1 { "Kartenwerk" }
            p { style: "color: #666;",
                "Fill in the details, add a passport photo, and download a printable ID card."
            }

            // Photo box: file pick, drag-and-drop target, camera entry.
            div {
                style: "border: 2px dashed {drag_border}; box-shadow: {drag_shadow}; border-radius: 12px; padding: 16px; text-align: center; margin: 16px 0; background: white;",
                ondragover: move |evt| {
                    evt.prevent_default();
                    state.write().drag = DragFeedback::Active;
                },
                ondragleave: move |_| {
                    state.write().drag = DragFeedback::Idle;
                },
                ondrop: {
                    let svc = svc.clone();
                    move |evt| {
                        evt.prevent_default();
                        state.write().drag = DragFeedback::Idle;
                        if let Some(engine) = evt.files() {
                            let svc = svc.clone();
                            spawn(async move {
                                if let Some(name) = engine.files().first().cloned()
                                    && let Some(bytes) = engine.read_file(&name).await
                                {
                                    attach_photo_bytes(&svc, state, &bytes);
                                }
                            });
                        }
                    }
                },

                if let Some(ref src) = state.read().photo_src {
                    img {
                        src: "{src}",
                        style: "width: 140px; height: 140px; object-fit: cover; border-radius: 8px; border: 2px solid #2575fc;",
                    }
                } else {
                    p { style: "font-size: 48px; margin: 8px 0;", "\u{1F464}" }
                    p { style: "color: #888; margin: 4px 0;", "Drop a passport photo here, or" }
                }

                div { style: "display: flex; gap: 8px; justify-content: center; margin-top: 12px;",
                    button {
                        style: "padding: 10px 16px; border-radius: 8px; border: 1px solid #2575fc; color: #2575fc; background: white;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Images", &["jpg", "jpeg", "png"])
                                    .pick_file()
                                {
                                    match std::fs::read(&path) {
                                        Ok(bytes) => attach_photo_bytes(&svc, state, &bytes),
                                        Err(err) => report_error(state, &err.into()),
                                    }
                                }
                            }
                        },
                        "Choose Photo"
                    }
                    button {
                        style: "padding: 10px 16px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                match svc.open_camera() {
                                    Ok(()) => state.write().camera = CameraViewState::Live,
                                    // Denied or unavailable: the surface never opens.
                                    Err(err) => report_error(state, &err),
                                }
                            }
                        },
                        "\u{1F4F7} Use Camera"
                    }
                    if state.read().photo_view == PhotoViewState::HasPhoto {
                        button {
                            style: "padding: 10px 16px; border-radius: 8px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                            onclick: {
                                let svc = svc.clone();
                                move |_| {
                                    svc.remove_photo();
                                    let mut st = state.write();
                                    st.photo_src = None;
                                    st.photo_view = PhotoViewState::Empty;
                                }
                            },
                            "Remove"
                        }
                    }
                }
            }

            // Personal details form.
            div { style: "display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 8px;",
                FieldInput { label: "First Name *", value: first_name, oninput: move |v| first_name.set(v) }
                FieldInput { label: "Middle Name", value: middle_name, oninput: move |v| middle_name.set(v) }
                FieldInput { label: "Last Name *", value: last_name, oninput: move |v| last_name.set(v) }
            }

            div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 8px; margin-top: 8px;",
                div {
                    label { style: "display: block; font-size: 14px; font-weight: bold; margin-bottom: 4px;",
                        "Date of Birth *"
                    }
                    input {
                        r#type: "date",
                        max: "{today}",
                        value: "{date_of_birth}",
                        style: "width: 100%; padding: 12px; font-size: 16px; border: 2px solid #ccc; border-radius: 8px; box-sizing: border-box;",
                        oninput: move |evt| date_of_birth.set(evt.value().to_string()),
                    }
                }
                div {
                    label { style: "display: block; font-size: 14px; font-weight: bold; margin-bottom: 4px;",
                        "Phone (10 digits) *"
                    }
                    input {
                        r#type: "tel",
                        placeholder: "1234567890",
                        value: "{phone}",
                        style: "width: 100%; padding: 12px; font-size: 16px; border: 2px solid #ccc; border-radius: 8px; box-sizing: border-box;",
                        oninput: move |evt| phone.set(evt.value().to_string()),
                    }
                }
            }

            div { style: "margin-top: 8px;",
                label { style: "display: block; font-size: 14px; font-weight: bold; margin-bottom: 4px;",
                    "Address *"
                }
                textarea {
                    rows: "2",
                    value: "{address}",
                    style: "width: 100%; padding: 12px; font-size: 16px; border: 2px solid #ccc; border-radius: 8px; box-sizing: border-box; resize: vertical;",
                    oninput: move |evt| address.set(evt.value().to_string()),
                }
            }

            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: none; background: #2575fc; color: white; font-size: 18px; font-weight: bold; margin-top: 16px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let fields = FormFields {
                            first_name: first_name.read().clone(),
                            middle_name: middle_name.read().clone(),
                            last_name: last_name.read().clone(),
                            date_of_birth: date_of_birth.read().clone(),
                            phone: phone.read().clone(),
                            address: address.read().clone(),
                        };
                        match svc.submit(fields) {
                            Ok(preview) => {
                                {
                                    let mut st = state.write();
                                    st.preview = Some(preview);
                                    st.submit_flash = SubmitFlash::JustSubmitted;
                                    st.status_message = None;
                                }
                                spawn(async move {
                                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                                    state.write().submit_flash = SubmitFlash::Resubmit;
                                });
                            }
                            Err(err) => report_error(state, &err),
                        }
                    }
                },
                "{submit_label}"
            }

            // Preview + download, shown after the first successful submission.
            if let Some(ref preview) = state.read().preview {
                div { style: "margin-top: 24px; padding: 16px; border: 1px solid #e0e0e0; border-radius: 12px; background: #fafafa;",
                    h3 { style: "margin-top: 0;", "{card_title}" }
                    if let Some(ref src) = state.read().photo_src {
                        img {
                            src: "{src}",
                            style: "width: 90px; height: 90px; object-fit: cover; border-radius: 6px; border: 1px solid #ccc; float: right;",
                        }
                    }
                    PreviewRow { label: "Student ID", value: preview.card_id.clone() }
                    PreviewRow { label: "Full Name", value: preview.full_name.clone() }
                    PreviewRow { label: "Date of Birth", value: preview.date_of_birth.clone() }
                    PreviewRow { label: "Phone", value: preview.phone.clone() }
                    PreviewRow { label: "Address", value: preview.address.clone() }
                    PreviewRow { label: "Date Issued", value: preview.issue_date.clone() }

                    button {
                        style: "width: 100%; padding: 14px; border-radius: 12px; border: none; background: #00c896; color: white; font-size: 16px; font-weight: bold; margin-top: 12px;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let artifact = match svc.export_card() {
                                    Ok(artifact) => artifact,
                                    Err(err) => {
                                        report_error(state, &err);
                                        return;
                                    }
                                };
                                if let Err(err) = svc.store_artifact(&artifact) {
                                    tracing::warn!(error = %err, "could not store export copy");
                                }
                                if let Some(path) = rfd::FileDialog::new()
                                    .set_file_name(&artifact.filename)
                                    .add_filter("PDF", &["pdf"])
                                    .save_file()
                                    && let Err(err) = std::fs::write(&path, &artifact.bytes)
                                {
                                    report_error(state, &err.into());
                                    return;
                                }
                                {
                                    let mut st = state.write();
                                    st.download_flash = DownloadFlash::Done;
                                    st.status_message =
                                        Some(format!("Saved {}", artifact.filename));
                                }
                                spawn(async move {
                                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                                    state.write().download_flash = DownloadFlash::Idle;
                                });
                            }
                        },
                        "{download_label}"
                    }
                }
            }

            // Status
            if let Some(ref msg) = state.read().status_message {
                p { style: "margin-top: 12px; padding: 12px; border-radius: 8px; background: #f0f0f0; color: #333; font-size: 14px; text-align: center;",
                    "{msg}"
                }
            }

            if state.read().camera == CameraViewState::Live {
                CameraModal {}
            }
        }
    }
}

/// The capture surface. Every way out — capture, cancel, the close control,
/// or a click on the backdrop — releases the camera through the same
/// service call.
#[component]
fn CameraModal() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    rsx! {
        // Backdrop: clicking outside the panel dismisses.
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.6); display: flex; align-items: center; justify-content: center; z-index: 10;",
            onclick: {
                let svc = svc.clone();
                move |_| {
                    svc.close_camera();
                    state.write().camera = CameraViewState::Closed;
                }
            },
            div {
                style: "background: white; border-radius: 12px; padding: 16px; width: 420px; max-width: 90vw;",
                onclick: move |evt| evt.stop_propagation(),

                div { style: "display: flex; justify-content: space-between; align-items: center;",
                    h3 { style: "margin: 0;", "Take a Photo" }
                    button {
                        style: "border: none; background: none; font-size: 20px; color: #888;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                svc.close_camera();
                                state.write().camera = CameraViewState::Closed;
                            }
                        },
                        "\u{00D7}"
                    }
                }

                // Live view. Frame preview needs the native bridge; until a
                // platform backend provides frames this stays a static pane.
                div { style: "height: 240px; margin: 12px 0; border-radius: 8px; background: #222; color: #bbb; display: flex; align-items: center; justify-content: center;",
                    "Live camera view"
                }

                div { style: "display: flex; gap: 8px;",
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #2575fc; color: white; font-weight: bold;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                match svc.capture_photo() {
                                    Ok(photo) => {
                                        let mut st = state.write();
                                        st.photo_src = Some(photo_data_uri(&photo.png));
                                        st.photo_view = PhotoViewState::HasPhoto;
                                        st.camera = CameraViewState::Closed;
                                        st.status_message = None;
                                    }
                                    Err(err) => {
                                        // The device is already released; just
                                        // close the surface and report.
                                        state.write().camera = CameraViewState::Closed;
                                        report_error(state, &err);
                                    }
                                }
                            }
                        },
                        "Capture"
                    }
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                svc.close_camera();
                                state.write().camera = CameraViewState::Closed;
                            }
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}

#[component]
fn FieldInput(label: &'static str, value: Signal<String>, oninput: EventHandler<String>) -> Element {
    rsx! {
        div {
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

#[component]
fn PreviewRow(label: &'static str, value: String) -> Element {
    rsx! {
        p { style: "margin: 6px 0; font-size: 15px;",
            span { style: "font-weight: bold; color: #555;", "{label}: " }
            span { "{value}" }
        }
    }
}
