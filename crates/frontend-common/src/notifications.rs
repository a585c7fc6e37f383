//! Toast notifications

use crate::config::{MAX_TOASTS, TOAST_TIMEOUT_MS};
use codemarket_session::{Notification, NotificationLevel, Notifier};
use gloo::timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

/// Toasts currently on screen, oldest first
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
    next_id: u64,
}

pub enum ToastAction {
    Push(Notification),
    Dismiss(u64),
    Clear,
}

pub type ToastContext = UseReducerHandle<ToastState>;

impl ToastState {
    /// Id of the newest toast, if any
    pub fn latest(&self) -> Option<u64> {
        self.toasts.last().map(|toast| toast.id)
    }
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ToastAction::Push(notification) => {
                let mut toasts = self.toasts.clone();
                toasts.push(Toast {
                    id: self.next_id,
                    level: notification.level,
                    message: notification.message,
                });
                let excess = toasts.len().saturating_sub(MAX_TOASTS);
                toasts.drain(..excess);
                Rc::new(Self {
                    toasts,
                    next_id: self.next_id + 1,
                })
            }
            ToastAction::Dismiss(id) => {
                if !self.toasts.iter().any(|toast| toast.id == id) {
                    return self;
                }
                Rc::new(Self {
                    toasts: self
                        .toasts
                        .iter()
                        .filter(|toast| toast.id != id)
                        .cloned()
                        .collect(),
                    next_id: self.next_id,
                })
            }
            ToastAction::Clear => Rc::new(Self {
                toasts: Vec::new(),
                next_id: self.next_id,
            }),
        }
    }
}

/// Session notifier that queues toasts
pub struct ToastNotifier {
    dispatcher: UseReducerDispatcher<ToastState>,
}

impl ToastNotifier {
    pub fn new(dispatcher: UseReducerDispatcher<ToastState>) -> Self {
        Self { dispatcher }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        self.dispatcher.dispatch(ToastAction::Push(notification));
    }
}

fn level_class(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "bg-green-600 text-white",
        NotificationLevel::Error => "bg-red-600 text-white",
        NotificationLevel::Info => "bg-gray-800 text-white",
    }
}

/// Renders the toast stack and expires each toast after a while
#[function_component(Toasts)]
pub fn toasts() -> Html {
    let Some(toasts) = use_context::<ToastContext>() else {
        return Html::default();
    };

    {
        let dispatcher = toasts.dispatcher();
        use_effect_with(toasts.latest(), move |latest| {
            let timeout = latest.map(|id| {
                Timeout::new(TOAST_TIMEOUT_MS, move || {
                    dispatcher.dispatch(ToastAction::Dismiss(id));
                })
            });
            move || {
                // Let the timer run to completion even if a newer toast arrives
                if let Some(timeout) = timeout {
                    timeout.forget();
                }
            }
        });
    }

    html! {
        <div class="fixed top-4 right-4 z-50 flex flex-col gap-2">
            { for toasts.toasts.iter().map(|toast| {
                let id = toast.id;
                let onclick = {
                    let dispatcher = toasts.dispatcher();
                    Callback::from(move |_| dispatcher.dispatch(ToastAction::Dismiss(id)))
                };
                html! {
                    <div key={id} class={classes!("px-4", "py-3", "rounded", "shadow", level_class(toast.level))}
                        role="status">
                        <span>{ &toast.message }</span>
                        <button class="ml-3" aria-label="Dismiss" {onclick}>{"×"}</button>
                    </div>
                }
            }) }
        </div>
    }
}
