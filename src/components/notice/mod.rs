//! Toast stack for user-facing notices.

use leptos::prelude::*;
use msgview_core::Severity;

use crate::app::AppContext;
use crate::models::dismiss;

stylance::import_crate_style!(css, "src/components/notice/notice.module.css");

/// Get CSS class for a notice severity
fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => css::info,
        Severity::Warning => css::warning,
        Severity::Error => css::error,
    }
}

#[component]
pub fn NoticeStack() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let notices = ctx.notices;

    view! {
        <div class=css::stack role="status">
            <For
                each=move || notices.get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div
                            class=format!("{} {}", css::notice, severity_class(notice.severity))
                            on:click=move |_| notices.update(|n| dismiss(n, id))
                        >
                            {notice.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
