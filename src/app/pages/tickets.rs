//! Support tickets: open a conversation with the platform team.

use dioxus::prelude::*;

use crate::api::{NewTicketRequest, Ticket};
use crate::app::auth::use_api;
use crate::app::components::{ErrorAlert, Layout, Modal, StatusBadge};
use crate::app::format::format_date;
use crate::app::toast::use_toast;

/// Replies are only possible while the ticket is open.
pub fn can_reply(ticket: &Ticket, draft: &str) -> bool {
    !ticket.is_closed() && !draft.trim().is_empty()
}

#[component]
pub fn Tickets() -> Element {
    let client = use_api();
    let toast = use_toast();

    let mut tickets = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.tickets().await.ok() }
        }
    });

    let mut selected_id = use_signal(|| None::<String>);
    let mut show_create = use_signal(|| false);
    let mut subject = use_signal(String::new);
    let mut body = use_signal(String::new);
    let mut reply = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let submit_ticket = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            if subject().trim().is_empty() || body().trim().is_empty() {
                error.set(Some("Fill in a subject and a message.".to_string()));
                return;
            }

            let client = client.clone();
            let request = NewTicketRequest {
                subject: subject().trim().to_string(),
                body: body().trim().to_string(),
            };

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.create_ticket(&request).await {
                    Ok(t) => {
                        toast.success("Ticket opened");
                        show_create.set(false);
                        subject.set(String::new());
                        body.set(String::new());
                        selected_id.set(Some(t.id));
                        tickets.restart();
                    }
                    Err(err) => {
                        error.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let send_reply = {
        let client = client.clone();
        move |ticket_id: String| {
            let client = client.clone();
            let message = reply().trim().to_string();
            if message.is_empty() {
                return;
            }

            busy.set(true);
            spawn(async move {
                match client.reply_ticket(&ticket_id, &message).await {
                    Ok(_) => {
                        reply.set(String::new());
                        tickets.restart();
                    }
                    Err(err) => {
                        toast.error(err.user_message());
                    }
                }
                busy.set(false);
            });
        }
    };

    let set_status = {
        let client = client.clone();
        move |(ticket_id, status): (String, &'static str)| {
            let client = client.clone();
            spawn(async move {
                match client.set_ticket_status(&ticket_id, status).await {
                    Ok(_) => tickets.restart(),
                    Err(err) => toast.error(err.user_message()),
                }
            });
        }
    };

    let list = tickets.read().clone().flatten().unwrap_or_default();
    let is_loading = tickets.read().is_none();
    let selected: Option<Ticket> = selected_id()
        .and_then(|id| list.iter().find(|t| t.id == id).cloned());

    rsx! {
        Layout {
            title: "Support".to_string(),
            nav_active: "tickets".to_string(),

            div { class: "page-head",
                h1 { "Support" }
                button {
                    onclick: move |_| show_create.set(true),
                    "New ticket"
                }
            }

            if is_loading {
                p { aria_busy: "true", "Loading tickets..." }
            } else if list.is_empty() {
                p { class: "text-muted", "No tickets. Open one if you need help." }
            } else {
                div { class: "split",
                    table { class: "ticket-list",
                        thead {
                            tr {
                                th { "Subject" }
                                th { "Updated" }
                                th { "Status" }
                            }
                        }
                        tbody {
                            for t in list.clone() {
                                tr {
                                    key: "{t.id}",
                                    class: if selected_id() == Some(t.id.clone()) { "selected" } else { "" },
                                    onclick: {
                                        let id = t.id.clone();
                                        move |_| selected_id.set(Some(id.clone()))
                                    },
                                    td { "{t.subject}" }
                                    td { "{format_date(&t.updated_at)}" }
                                    td { StatusBadge { status: t.status.clone() } }
                                }
                            }
                        }
                    }

                    if let Some(ticket) = selected {
                        article { class: "ticket-thread",
                            header {
                                hgroup {
                                    h3 { "{ticket.subject}" }
                                    p { "opened {format_date(&ticket.created_at)}" }
                                }
                                if ticket.is_closed() {
                                    button {
                                        class: "outline",
                                        onclick: {
                                            let mut set_status = set_status.clone();
                                            let id = ticket.id.clone();
                                            move |_| set_status((id.clone(), "open"))
                                        },
                                        "Reopen"
                                    }
                                } else {
                                    button {
                                        class: "outline",
                                        onclick: {
                                            let mut set_status = set_status.clone();
                                            let id = ticket.id.clone();
                                            move |_| set_status((id.clone(), "closed"))
                                        },
                                        "Close"
                                    }
                                }
                            }

                            div { class: "messages",
                                for message in ticket.messages.clone() {
                                    div {
                                        key: "{message.id}",
                                        class: if message.from_support { "message from-support" } else { "message" },
                                        p { class: "message-meta",
                                            strong { "{message.author}" }
                                            small { class: "text-muted", " {format_date(&message.created_at)}" }
                                        }
                                        p { "{message.body}" }
                                    }
                                }
                            }

                            if ticket.is_closed() {
                                p { class: "text-muted", "This ticket is closed. Reopen it to reply." }
                            } else {
                                textarea {
                                    rows: "3",
                                    placeholder: "Write a reply...",
                                    value: "{reply}",
                                    oninput: move |e| reply.set(e.value()),
                                }
                                button {
                                    aria_busy: "{busy}",
                                    disabled: busy() || !can_reply(&ticket, &reply()),
                                    onclick: {
                                        let mut send_reply = send_reply.clone();
                                        let id = ticket.id.clone();
                                        move |_| send_reply(id.clone())
                                    },
                                    "Send reply"
                                }
                            }
                        }
                    } else {
                        p { class: "text-muted", "Select a ticket to read the conversation." }
                    }
                }
            }

            if show_create() {
                Modal {
                    title: "New ticket".to_string(),
                    on_close: move |_| {
                        show_create.set(false);
                        error.set(None);
                    },

                    if let Some(message) = error() {
                        ErrorAlert {
                            message,
                            on_dismiss: move |_| error.set(None),
                        }
                    }

                    form { onsubmit: submit_ticket,
                        label { "Subject"
                            input {
                                r#type: "text",
                                value: "{subject}",
                                oninput: move |e| subject.set(e.value()),
                            }
                        }
                        label { "Message"
                            textarea {
                                rows: "5",
                                value: "{body}",
                                oninput: move |e| body.set(e.value()),
                            }
                        }
                        button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                            "Open ticket"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(status: &str) -> Ticket {
        Ticket {
            id: "t1".to_string(),
            subject: "Refund".to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn closed_tickets_refuse_replies() {
        assert!(!can_reply(&ticket("closed"), "hello"));
        assert!(can_reply(&ticket("open"), "hello"));
    }

    #[test]
    fn empty_replies_are_refused() {
        assert!(!can_reply(&ticket("open"), ""));
        assert!(!can_reply(&ticket("open"), "   "));
    }
}
