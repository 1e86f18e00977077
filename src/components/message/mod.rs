//! Chat message view.
//!
//! Each message body is laid out in rows: runs of inline segments share a
//! line, block segments and cards get their own. Card HTML comes out of
//! `msgview_core` escaped or allow-list filtered and is inserted as-is.
//! Only cards with a link or a forward target react to clicks.

use leptos::prelude::*;
use msgview_core::{MessageSegment, Rendered, RenderedCard, render_segment};

use crate::app::AppContext;
use crate::models::{ChatMessage, SegmentRow, layout_rows};
use crate::utils::dom::console_warn;

stylance::import_crate_style!(css, "src/components/message/message.module.css");

#[component]
pub fn MessageList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    view! {
        <section class=css::list>
            <Show when=move || ctx.messages.with(|m| m.is_empty())>
                <p class=css::empty>"No messages"</p>
            </Show>
            <For
                each=move || ctx.messages.get()
                key=|message| message.message_id.clone()
                children=|message| view! { <MessageView message=message /> }
            />
        </section>
    }
}

#[component]
fn MessageView(message: ChatMessage) -> impl IntoView {
    let rows = layout_rows(&message.segments);
    let ChatMessage {
        message_id,
        sender,
        segments,
    } = message;

    let segment_view = |index: usize| {
        view! { <SegmentView segment=segments[index].clone() message_id=message_id.clone() /> }
    };

    let body = rows
        .into_iter()
        .map(|row| match row {
            SegmentRow::Inline(indices) => {
                let items = indices.into_iter().map(segment_view).collect_view();
                view! { <div class=css::inlineRow>{items}</div> }.into_any()
            }
            SegmentRow::Block(index) => {
                view! { <div class=css::blockRow>{segment_view(index)}</div> }.into_any()
            }
        })
        .collect_view();

    view! {
        <article class=css::message>
            <div class=css::sender>{sender}</div>
            <div class=css::body>{body}</div>
        </article>
    }
}

#[component]
fn SegmentView(segment: MessageSegment, message_id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    match render_segment(&segment, &message_id, &ctx.i18n) {
        Ok(Rendered::Text(html)) => view! {
            <span class=css::text inner_html=html></span>
        }
        .into_any(),
        Ok(Rendered::Card(RenderedCard {
            element_id: Some(element_id),
            html,
            descriptor,
        })) => {
            let clickable = descriptor.is_clickable();
            ctx.register_card(&element_id, descriptor);
            let on_click = move |_| {
                if clickable {
                    ctx.click_card(&element_id);
                }
            };
            view! {
                <div class=card_class(clickable) inner_html=html on:click=on_click></div>
            }
            .into_any()
        }
        Ok(Rendered::Card(card)) => view! {
            <div class=css::card inner_html=card.html></div>
        }
        .into_any(),
        Ok(Rendered::Skipped) => view! {
            <span class=css::placeholder>{format!("[{}]", segment.type_tag)}</span>
        }
        .into_any(),
        Err(err) => {
            console_warn(&format!(
                "Message {}: {} segment not rendered: {}",
                message_id, segment.type_tag, err
            ));
            view! {
                <span class=css::placeholder>{format!("[{}]", segment.type_tag)}</span>
            }
            .into_any()
        }
    }
}

fn card_class(clickable: bool) -> String {
    if clickable {
        format!("{} {}", css::card, css::clickable)
    } else {
        css::card.to_string()
    }
}
