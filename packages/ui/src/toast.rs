use dioxus::core::{current_scope_id, Runtime};
use dioxus::prelude::*;

use crate::icons::{FaCircleCheck, FaCircleExclamation, FaCircleInfo, FaXmark};
use crate::session::use_session;
use crate::Icon;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
            ToastKind::Info => "toast toast--info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

/// Handle for raising toasts. Cheap to copy into handlers.
///
/// Expiry timers run in the scope that owns the queue, so a toast raised just
/// before navigating away still dismisses itself.
#[derive(Clone, Copy)]
pub struct Toaster {
    queue: Signal<ToastQueue>,
    duration_ms: u32,
    host: ScopeId,
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    pub fn dismiss(&self, id: u64) {
        let mut queue = self.queue;
        queue.write().items.retain(|t| t.id != id);
    }

    fn push(&self, kind: ToastKind, message: String) {
        let mut queue = self.queue;
        let id = {
            let mut q = queue.write();
            q.next_id += 1;
            let id = q.next_id;
            q.items.push(Toast { id, kind, message });
            id
        };

        if self.duration_ms == 0 {
            return;
        }
        let toaster = *self;
        Runtime::current().spawn(self.host, async move {
            sleep_ms(toaster.duration_ms).await;
            toaster.dismiss(id);
        });
    }
}

async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(std::time::Duration::from_millis(ms as u64)).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

/// Get the toast handle provided by [`ToastHost`].
pub fn use_toast() -> Toaster {
    use_context::<Toaster>()
}

/// Create the toast queue in the calling component and provide it to its
/// children. Toasts expire after `duration_ms`; zero keeps them until closed.
fn use_toaster(duration_ms: u32) -> Toaster {
    let queue = use_signal(ToastQueue::default);
    use_context_provider(|| Toaster {
        queue,
        duration_ms,
        host: current_scope_id(),
    })
}

/// Provides [`use_toast`] to its children and renders the toast stack.
/// Must sit inside a `SessionProvider`, which carries the display duration.
#[component]
pub fn ToastHost(children: Element) -> Element {
    let duration_ms = use_session().config().ui.toast_duration_ms;
    let toaster = use_toaster(duration_ms);
    let queue = toaster.queue;

    rsx! {
        {children}
        div {
            class: "toast-stack",
            for toast in queue().items {
                div {
                    key: "{toast.id}",
                    class: toast.kind.class(),
                    role: "status",
                    match toast.kind {
                        ToastKind::Success => rsx! { Icon { icon: FaCircleCheck, width: 16, height: 16 } },
                        ToastKind::Error => rsx! { Icon { icon: FaCircleExclamation, width: 16, height: 16 } },
                        ToastKind::Info => rsx! { Icon { icon: FaCircleInfo, width: 16, height: 16 } },
                    }
                    span { class: "toast__message", "{toast.message}" }
                    button {
                        class: "toast__close",
                        title: "Dismiss",
                        onclick: move |_| toaster.dismiss(toast.id),
                        Icon { icon: FaXmark, width: 12, height: 12 }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    use dioxus::core::{NoOpMutations, VirtualDom};

    thread_local! {
        static QUEUED: Cell<usize> = const { Cell::new(0) };
        static PEAK: Cell<usize> = const { Cell::new(0) };
    }

    fn record(len: usize) {
        QUEUED.with(|q| q.set(len));
        PEAK.with(|p| p.set(p.get().max(len)));
    }

    #[component]
    fn SavesOnMount() -> Element {
        let toast = use_toast();
        use_hook(move || toast.success("Saved"));
        rsx! { "page" }
    }

    /// Mirrors a view that raises a toast and then navigates away.
    fn leaves_after_toast() -> Element {
        let toaster = use_toaster(20);
        let mut show = use_signal(|| true);
        use_future(move || async move {
            sleep_ms(2).await;
            show.set(false);
        });
        record(toaster.queue.read().items.len());
        rsx! {
            if show() {
                SavesOnMount {}
            }
        }
    }

    fn stays_after_toast() -> Element {
        let toaster = use_toaster(20);
        record(toaster.queue.read().items.len());
        rsx! { SavesOnMount {} }
    }

    async fn drive(dom: &mut VirtualDom, for_ms: u64) {
        dom.rebuild_in_place();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(for_ms);
        loop {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                break;
            }
            if tokio::time::timeout(deadline - now, dom.wait_for_work())
                .await
                .is_err()
            {
                break;
            }
            dom.render_immediate(&mut NoOpMutations);
        }
    }

    #[tokio::test]
    async fn test_toast_expires_after_raising_view_unmounts() {
        let mut dom = VirtualDom::new(leaves_after_toast);
        drive(&mut dom, 200).await;

        assert_eq!(PEAK.with(Cell::get), 1, "toast was never shown");
        assert_eq!(QUEUED.with(Cell::get), 0, "toast never dismissed itself");
    }

    #[tokio::test]
    async fn test_toast_expires_while_raising_view_stays() {
        let mut dom = VirtualDom::new(stays_after_toast);
        drive(&mut dom, 200).await;

        assert_eq!(PEAK.with(Cell::get), 1);
        assert_eq!(QUEUED.with(Cell::get), 0);
    }
}
