use dioxus::prelude::*;

use crate::vm::NoticeSlot;

#[component]
pub fn NoticeBanner(slot: NoticeSlot) -> Element {
    let Some(notice) = slot.current() else {
        return rsx! {};
    };

    rsx! {
        div { class: "notice", role: "alert",
            p { "{notice.message}" }
            if notice.retryable {
                p { class: "hint", "Press the button again to retry." }
            }
            button { class: "notice-dismiss", onclick: move |_| slot.clear(), "Dismiss" }
        }
    }
}
