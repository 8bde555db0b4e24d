use folio_client::{
    api::{Comment, NewComment},
    CommentListController, CommentStore, DeleteTicket, Error, HttpStore, MapView,
    RefreshTicket,
};
use gloo_storage::{LocalStorage, Storage};
use std::rc::Rc;
use yew::prelude::*;

use crate::ui;

const KEY_NUM_COMMENTS: &str = "num-comments";
const DEFAULT_NUM_COMMENTS: usize = 5;

pub enum AppMsg {
    SetNumComments(usize),
    RefreshDone(RefreshTicket, Result<Vec<Comment>, Error>),
    Delete(Comment),
    DeleteDone(DeleteTicket, Result<(), Error>),
    DeleteAll,
    DeleteAllDone(Result<(), Error>),
    DismissNotice,
    ContactSubmit(NewComment),
    ContactDone(Result<(), Error>),

    MarkerClicked(usize),
    MarkerHovered(usize),
    MarkerLeft,
}

pub struct App {
    store: Rc<HttpStore>,
    comments: CommentListController,
    num_comments: usize,
    contact_sent: u64,
    map: MapView,
}

impl App {
    fn start_refresh(&self, ctx: &Context<Self>, ticket: Option<RefreshTicket>) {
        if let Some(ticket) = ticket {
            let store = self.store.clone();
            ctx.link().send_future(async move {
                let res = store.list_comments(ticket.limit).await;
                AppMsg::RefreshDone(ticket, res)
            });
        }
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let num_comments = LocalStorage::get(KEY_NUM_COMMENTS).unwrap_or(DEFAULT_NUM_COMMENTS);
        let mut this = App {
            store: Rc::new(crate::page_store()),
            comments: CommentListController::new(),
            num_comments,
            contact_sent: 0,
            map: MapView::default(),
        };
        let ticket = this.comments.begin_refresh(num_comments);
        this.start_refresh(ctx, ticket);
        this
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::SetNumComments(num) => {
                self.num_comments = num;
                if let Err(err) = LocalStorage::set(KEY_NUM_COMMENTS, num) {
                    tracing::warn!(?err, "failed saving number of comments to local storage");
                }
                let ticket = self.comments.begin_refresh(num);
                self.start_refresh(ctx, ticket);
            }
            AppMsg::RefreshDone(ticket, res) => {
                return self.comments.finish_refresh(ticket, res);
            }
            AppMsg::Delete(comment) => {
                let ticket = self.comments.begin_delete(&comment);
                let store = self.store.clone();
                ctx.link().send_future(async move {
                    let res = store.delete_comment(&ticket.0).await;
                    AppMsg::DeleteDone(ticket, res)
                });
            }
            AppMsg::DeleteDone(ticket, res) => {
                let reconcile = self.comments.finish_delete(ticket, res);
                self.start_refresh(ctx, reconcile);
            }
            AppMsg::DeleteAll => {
                self.comments.begin_delete_all();
                let store = self.store.clone();
                ctx.link().send_future(async move {
                    AppMsg::DeleteAllDone(store.delete_all_comments().await)
                });
            }
            AppMsg::DeleteAllDone(res) => {
                let reconcile = self.comments.finish_delete_all(res);
                self.start_refresh(ctx, reconcile);
            }
            AppMsg::DismissNotice => self.comments.dismiss_notice(),
            AppMsg::ContactSubmit(comment) => {
                if self.comments.begin_post(&comment) {
                    let store = self.store.clone();
                    ctx.link().send_future(async move {
                        AppMsg::ContactDone(store.contact_me(&comment).await)
                    });
                }
            }
            AppMsg::ContactDone(res) => {
                if res.is_ok() {
                    self.contact_sent += 1;
                }
                let ticket = self.comments.finish_post(res);
                self.start_refresh(ctx, ticket);
            }
            AppMsg::MarkerClicked(idx) => {
                if self.map.activate(idx).is_none() {
                    tracing::warn!(idx, "clicked on a marker that does not exist");
                }
            }
            AppMsg::MarkerHovered(idx) => self.map.hover(idx),
            AppMsg::MarkerLeft => self.map.unhover(),
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                <ui::NoticeBanner
                    notice={ self.comments.notice().cloned() }
                    stale={ self.comments.is_stale() }
                    on_dismiss={ ctx.link().callback(|_| AppMsg::DismissNotice) }
                />
                <section id="comments" class="my-4">
                    <div class="d-flex align-items-center">
                        <h2 class="flex-grow-1">{ "Comments" }</h2>
                        <ui::BusySpinner busy={ self.comments.is_busy() } />
                    </div>
                    <div class="d-flex align-items-center mb-3">
                        <ui::CommentCount
                            value={ self.num_comments }
                            on_change={ ctx.link().callback(AppMsg::SetNumComments) }
                        />
                        <button
                            type="button"
                            class="btn btn-danger ms-3"
                            onclick={ ctx.link().callback(|_| AppMsg::DeleteAll) }
                        >
                            { "Delete all comments" }
                        </button>
                    </div>
                    <ui::CommentListView
                        comments={ self.comments.view().clone() }
                        on_delete={ ctx.link().callback(AppMsg::Delete) }
                    />
                </section>
                <section id="contact" class="my-4">
                    <h2>{ "Leave a comment" }</h2>
                    <ui::ContactForm
                        sent={ self.contact_sent }
                        on_submit={ ctx.link().callback(AppMsg::ContactSubmit) }
                    />
                </section>
                <section id="map" class="my-4">
                    <h2>{ "Places" }</h2>
                    <ui::MapPanel
                        map={ self.map.clone() }
                        on_click={ ctx.link().callback(AppMsg::MarkerClicked) }
                        on_hover={ ctx.link().callback(AppMsg::MarkerHovered) }
                        on_leave={ ctx.link().callback(|_| AppMsg::MarkerLeft) }
                    />
                </section>
            </div>
        }
    }
}
