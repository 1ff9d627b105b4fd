//! 预约与支付页
//!
//! 价格明细是表单信号的派生值：小时数或保险勾选一变即重算
//! （等价于进入页面时的价格刷新钩子）。确认走两步 saga 流程，
//! 成功后弹出含托管说明的成功提示并回到个人中心。

use crate::api::AppApi;
use crate::components::success::use_success;
use crate::components::{alert, use_browse};
use crate::flows::FlowError;
use crate::flows::booking::{BookingForm, confirm_booking};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use careloop_shared::pricing;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn BookingPage() -> impl IntoView {
    let router = use_router();
    let browse = use_browse();
    let session = use_session();
    let success = use_success();
    let api = use_context::<AppApi>().expect("AppApi should be provided");

    // 无选中护工时回退
    Effect::new(move |_| {
        if browse.selected.get().is_none() {
            router.redirect(AppRoute::BrowseCaregivers);
        }
    });

    let hours = RwSignal::new(1u32);
    let date = RwSignal::new(String::new());
    let time = RwSignal::new(String::new());
    let use_custom_location = RwSignal::new(false);
    let custom_location = RwSignal::new(String::new());
    let special_needs = RwSignal::new(String::new());
    let insurance = RwSignal::new(false);
    let (is_submitting, set_is_submitting) = signal(false);

    // 价格明细派生值
    let breakdown = Signal::derive(move || {
        let rate = browse
            .selected
            .get()
            .map(|c| c.hourly_rate)
            .unwrap_or_default();
        pricing::quote(rate, hours.get(), insurance.get())
    });

    let on_confirm = move |_| {
        let Some(user) = session.state.get_untracked().user().cloned() else {
            alert("Please login first");
            return;
        };
        let Some(caregiver) = browse.selected.get_untracked() else {
            return;
        };

        let form = BookingForm {
            hours: hours.get_untracked(),
            date: date.get_untracked(),
            time: time.get_untracked(),
            use_custom_location: use_custom_location.get_untracked(),
            custom_location: custom_location.get_untracked(),
            special_needs: special_needs.get_untracked(),
            insurance: insurance.get_untracked(),
        };

        set_is_submitting.set(true);
        let api = api.clone();
        let care_type = browse.care_type.get_untracked();
        spawn_local(async move {
            match confirm_booking(&api, &user, &caregiver, care_type.as_deref(), &form).await {
                Ok(confirmation) => {
                    let mut lines = vec![
                        format!(
                            "Your booking with {} has been confirmed!",
                            confirmation.caregiver_name
                        ),
                        format!("Duration: {} hours", form.hours),
                        format!("Date: {} at {}", confirmation.date, confirmation.time),
                        format!("Location: {}", confirmation.location),
                    ];
                    if let Some(needs) = &confirmation.special_needs {
                        lines.push(format!("Special requests: {}", needs));
                    }
                    lines.push(format!("Total amount: RM {}", confirmation.breakdown.total));
                    lines.push(
                        "🔒 Escrow payment protection: your payment is held securely and \
                         released only after the caregiver marks the job complete and you \
                         confirm it."
                            .to_string(),
                    );
                    lines.push("The caregiver will contact you soon!".to_string());
                    success.show("Payment Successful!", lines, Some(AppRoute::UserProfile));
                }
                Err(FlowError::Validation(msg)) => alert(&msg),
                Err(_) => alert("Booking failed. Please try again."),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-2xl mx-auto p-8">
            <h1 class="text-3xl font-bold mb-6">"Book your caregiver"</h1>

            <div class="card bg-base-100 shadow-xl card-body gap-3">
                <div class="grid grid-cols-2 gap-3">
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Duration"</span></label>
                        <select
                            class="select select-bordered"
                            on:change=move |ev| {
                                hours.set(event_target_value(&ev).parse().unwrap_or(1));
                            }
                        >
                            {(1u32..=8)
                                .map(|h| view! { <option value=h.to_string()>{format!("{} hours", h)}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Date"</span></label>
                        <input
                            type="date"
                            class="input input-bordered"
                            on:input=move |ev| date.set(event_target_value(&ev))
                            prop:value=date
                        />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Time"</span></label>
                        <input
                            type="time"
                            class="input input-bordered"
                            on:input=move |ev| time.set(event_target_value(&ev))
                            prop:value=time
                        />
                    </div>
                </div>

                <div class="form-control">
                    <label class="label"><span class="label-text">"Service location"</span></label>
                    <label class="label cursor-pointer justify-start gap-2">
                        <input
                            type="radio"
                            name="location-option"
                            class="radio"
                            checked=move || !use_custom_location.get()
                            on:change=move |_| use_custom_location.set(false)
                        />
                        <span>
                            "My address: "
                            {move || session.state.get().user().map(|u| u.location.clone()).unwrap_or_default()}
                        </span>
                    </label>
                    <label class="label cursor-pointer justify-start gap-2">
                        <input
                            type="radio"
                            name="location-option"
                            class="radio"
                            checked=move || use_custom_location.get()
                            on:change=move |_| use_custom_location.set(true)
                        />
                        <span>"Another address"</span>
                    </label>
                    <Show when=move || use_custom_location.get()>
                        <input
                            type="text"
                            class="input input-bordered"
                            placeholder="Street, city, postcode"
                            on:input=move |ev| custom_location.set(event_target_value(&ev))
                            prop:value=custom_location
                        />
                    </Show>
                </div>

                <div class="form-control">
                    <label class="label"><span class="label-text">"Special needs (optional)"</span></label>
                    <textarea
                        class="textarea textarea-bordered"
                        on:input=move |ev| special_needs.set(event_target_value(&ev))
                        prop:value=special_needs
                    ></textarea>
                </div>

                <label class="label cursor-pointer justify-start gap-2">
                    <input
                        type="checkbox"
                        class="checkbox"
                        prop:checked=insurance
                        on:change=move |ev| insurance.set(event_target_checked(&ev))
                    />
                    <span>"Add care insurance (RM 6 flat)"</span>
                </label>

                <div class="bg-base-200 rounded-box p-4 text-sm space-y-1">
                    <div class="flex justify-between">
                        <span>"Hourly rate"</span>
                        <span>
                            {move || format!("RM {}/hour", browse.selected.get().map(|c| c.hourly_rate).unwrap_or_default())}
                        </span>
                    </div>
                    <div class="flex justify-between">
                        <span>"Subtotal"</span>
                        <span>{move || format!("RM {}", breakdown.get().subtotal)}</span>
                    </div>
                    <Show when=move || insurance.get()>
                        <div class="flex justify-between">
                            <span>"Insurance"</span>
                            <span>{move || format!("RM {}", breakdown.get().insurance_fee)}</span>
                        </div>
                    </Show>
                    <div class="flex justify-between">
                        <span>"Service fee (5%)"</span>
                        <span>{move || format!("RM {}", breakdown.get().service_fee)}</span>
                    </div>
                    <div class="flex justify-between font-bold text-base border-t pt-1">
                        <span>"Total"</span>
                        <span class="text-primary">{move || format!("RM {}", breakdown.get().total)}</span>
                    </div>
                </div>

                <button class="btn btn-primary" disabled=move || is_submitting.get() on:click=on_confirm>
                    {move || if is_submitting.get() { "Confirming..." } else { "Confirm & pay" }}
                </button>
            </div>
        </div>
    }
}
