//! 成功提示弹窗
//!
//! 标题 + 多行文案 + 关闭后的返回页。预约确认、接单、完工等流程
//! 共用这一个弹窗。

use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessNotice {
    pub title: String,
    /// 逐行渲染的正文
    pub lines: Vec<String>,
    /// 关闭弹窗后导航到的页面
    pub return_to: Option<AppRoute>,
}

#[derive(Clone, Copy)]
pub struct SuccessContext(pub RwSignal<Option<SuccessNotice>>);

impl SuccessContext {
    pub fn show(&self, title: &str, lines: Vec<String>, return_to: Option<AppRoute>) {
        self.0.set(Some(SuccessNotice {
            title: title.to_string(),
            lines,
            return_to,
        }));
    }
}

pub fn use_success() -> SuccessContext {
    use_context::<SuccessContext>().expect("SuccessContext should be provided")
}

#[component]
pub fn SuccessModal() -> impl IntoView {
    let SuccessContext(notice) = use_success();
    let router = use_router();

    let on_close = move |_| {
        let return_to = notice.get_untracked().and_then(|n| n.return_to);
        notice.set(None);
        if let Some(route) = return_to {
            router.navigate(route);
        }
    };

    view! {
        <Show when=move || notice.get().is_some()>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h2 class="text-2xl font-bold text-success mb-4">
                        {move || notice.get().map(|n| n.title).unwrap_or_default()}
                    </h2>
                    <div class="space-y-1">
                        <For
                            each=move || notice.get().map(|n| n.lines).unwrap_or_default()
                            key=|line| line.clone()
                            children=move |line| view! { <p class="text-sm">{line}</p> }
                        />
                    </div>
                    <div class="modal-action">
                        <button class="btn btn-primary" on:click=on_close>"Continue"</button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
