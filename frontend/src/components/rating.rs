//! 评价弹窗
//!
//! 对一条已完成且未评价的预约打星（1..=5）并附可选文字。
//! 提交成功后 bump 历史版本号让个人中心重新拉取。

use crate::api::AppApi;
use crate::components::success::use_success;
use crate::components::{alert, use_history_rev};
use crate::flows::FlowError;
use crate::flows::reviews::{RATING_LABELS, submit_review};
use crate::session::use_session;
use careloop_shared::BookingRecord;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct RatingContext {
    /// 待评价的预约；Some 即弹窗可见
    pub target: RwSignal<Option<BookingRecord>>,
}

impl RatingContext {
    pub fn new() -> Self {
        Self {
            target: RwSignal::new(None),
        }
    }
}

impl Default for RatingContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_rating() -> RatingContext {
    use_context::<RatingContext>().expect("RatingContext should be provided")
}

#[component]
pub fn RatingModal() -> impl IntoView {
    let rating_ctx = use_rating();
    let session = use_session();
    let success = use_success();
    let history_rev = use_history_rev();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    let (stars, set_stars) = signal(0u8);
    let (review_text, set_review_text) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let reset = move || {
        set_stars.set(0);
        set_review_text.set(String::new());
    };

    let on_close = move |_| {
        rating_ctx.target.set(None);
        reset();
    };

    let on_submit = move |_| {
        let rating = stars.get_untracked();
        if rating == 0 {
            alert("Please select a rating");
            return;
        }
        let Some(booking) = rating_ctx.target.get_untracked() else {
            return;
        };
        let Some(user) = session.state.get_untracked().user().cloned() else {
            return;
        };

        set_is_submitting.set(true);
        let api = api.clone();
        let text = review_text.get_untracked();
        spawn_local(async move {
            match submit_review(&api, &booking, user.user_id, rating, &text).await {
                Ok(()) => {
                    rating_ctx.target.set(None);
                    reset();
                    history_rev.bump();
                    success.show(
                        "Thank You!",
                        vec![
                            format!("Your {}-star review has been submitted successfully!", rating),
                            "Thank you for helping other users!".to_string(),
                        ],
                        None,
                    );
                }
                Err(FlowError::Validation(msg)) => alert(&msg),
                Err(_) => alert("Failed to submit review. Please try again."),
            }
            set_is_submitting.set(false);
        });
    };

    let rating_label = move || {
        let s = stars.get();
        if (1..=5).contains(&s) {
            RATING_LABELS[s as usize - 1]
        } else {
            "Select a rating"
        }
    };

    view! {
        <Show when=move || rating_ctx.target.get().is_some()>
            {
                let on_submit = on_submit.clone();
                move || {
                let on_submit = on_submit.clone();
                view! {
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg mb-2">
                        "Rate "
                        {move || rating_ctx.target.get().map(|b| b.caregiver_name).unwrap_or_default()}
                    </h3>

                    <div class="flex gap-1 text-3xl">
                        {(1u8..=5)
                            .map(|star| {
                                view! {
                                    <button
                                        class="cursor-pointer"
                                        style=move || {
                                            if stars.get() >= star { "opacity: 1" } else { "opacity: 0.3" }
                                        }
                                        on:click=move |_| set_stars.set(star)
                                    >
                                        "⭐"
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <p class="text-sm text-base-content/70 mb-2">{rating_label}</p>

                    <textarea
                        class="textarea textarea-bordered w-full"
                        placeholder="Share your experience (optional)"
                        on:input=move |ev| set_review_text.set(event_target_value(&ev))
                        prop:value=review_text
                    ></textarea>

                    <div class="modal-action">
                        <button class="btn btn-ghost" on:click=on_close>"Cancel"</button>
                        <button class="btn btn-primary" disabled=move || is_submitting.get() on:click=on_submit>
                            "Submit review"
                        </button>
                    </div>
                </div>
            </div>
                }
                }
            }
        </Show>
    }
}
