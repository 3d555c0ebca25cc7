//! Board session driver
//!
//! Glues an [`InteractionController`] to an [`EngineBridge`]. Each outbound
//! request runs as its own tokio task and posts a sequenced reply onto a
//! single queue; replies and push events are then applied one at a time, so
//! the controller never sees concurrent mutation.
//!
//! The push subscription is owned by the view. Dropping the view (normally
//! or while unwinding) releases it.

use super::controller::{Gesture, InteractionController, Outbound};
use crate::core::resources::BoardSettings;
use crate::networking::adapter::{decode_push, RemoteStateAdapter, Reply, Request};
use crate::networking::bridge::{BridgeResult, EngineBridge, Subscription};
use crate::rendering::board::BoardGrid;
use crate::ui::dialog::DialogInput;
use crate::ui::new_game::{NewGameAnswer, NewGamePrompt};
use crate::ui::promotion_ui::PromotionPrompt;
use shared::protocol::PushMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use web_time::Instant;

/// A finished request on its way back to the controller
#[derive(Debug)]
pub struct ReplyEnvelope {
    pub seq: u64,
    pub request: Request,
    pub result: BridgeResult<Reply>,
}

enum Inbound {
    Reply(ReplyEnvelope),
    Push(PushMessage),
}

pub struct BoardView<B: EngineBridge> {
    adapter: RemoteStateAdapter<B>,
    controller: InteractionController,
    subscription: Option<Subscription>,
    replies_tx: mpsc::UnboundedSender<ReplyEnvelope>,
    replies_rx: mpsc::UnboundedReceiver<ReplyEnvelope>,
    in_flight: usize,
    new_game_prompt: NewGamePrompt,
    promotion_prompt: PromotionPrompt,
}

impl<B: EngineBridge> BoardView<B> {
    /// Subscribe to pushes and send the mount requests.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount(bridge: Arc<B>, settings: &BoardSettings) -> Self {
        let subscription = bridge.subscribe();
        info!("[SESSION] Board mounted (push subscription {})", subscription.id());

        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        let mut view = Self {
            adapter: RemoteStateAdapter::new(bridge),
            controller: InteractionController::new(settings),
            subscription: Some(subscription),
            replies_tx,
            replies_rx,
            in_flight: 0,
            new_game_prompt: NewGamePrompt::new(),
            promotion_prompt: PromotionPrompt::new(),
        };
        let outbound = view.controller.mount();
        view.send(outbound);
        view.sync_prompts();
        view
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn new_game_prompt(&self) -> &NewGamePrompt {
        &self.new_game_prompt
    }

    pub fn promotion_prompt(&self) -> &PromotionPrompt {
        &self.promotion_prompt
    }

    /// Requests sent whose replies have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn view(&self) -> BoardGrid {
        self.controller.view()
    }

    pub fn dispatch(&mut self, gesture: Gesture) {
        let outbound = self.controller.handle_gesture(gesture);
        self.send(outbound);
        self.sync_prompts();
    }

    /// Route keyboard / pointer input to whichever prompt is open.
    pub fn dialog_input(&mut self, input: DialogInput) {
        if self.new_game_prompt.is_open() {
            match self.new_game_prompt.handle(input) {
                Some(NewGameAnswer::Confirm) => self.dispatch(Gesture::ConfirmNewGame),
                Some(NewGameAnswer::Decline) => self.dispatch(Gesture::DeclineNewGame),
                None => {}
            }
        } else if self.promotion_prompt.is_open() {
            if let Some(choice) = self.promotion_prompt.handle(input) {
                self.dispatch(Gesture::ChoosePromotion(choice));
            }
        }
        self.sync_prompts();
    }

    /// Drop notifications whose timeout has passed
    pub fn expire_notifications(&mut self) -> usize {
        self.controller.notifier_mut().expire(Instant::now())
    }

    fn send(&mut self, outbound: Vec<Outbound>) {
        for Outbound { seq, request } in outbound {
            let adapter = self.adapter.clone();
            let replies = self.replies_tx.clone();
            self.in_flight += 1;
            tokio::spawn(async move {
                let result = adapter.execute(request).await;
                // receiver gone means the view was torn down
                let _ = replies.send(ReplyEnvelope {
                    seq,
                    request,
                    result,
                });
            });
        }
    }

    fn sync_prompts(&mut self) {
        self.new_game_prompt.sync(self.controller.new_game_prompt_open());
        self.promotion_prompt.sync(self.controller.promotion_pending());
    }

    fn apply(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Reply(ReplyEnvelope {
                seq,
                request,
                result,
            }) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(reply) => {
                        let follow_up = self.controller.apply_reply(seq, reply);
                        self.send(follow_up);
                    }
                    Err(e) => self.controller.apply_failure(seq, request, &e),
                }
            }
            Inbound::Push(message) => {
                debug!("[SESSION] Push {:?}", message.event);
                self.controller.apply_push(decode_push(&message));
            }
        }
        self.sync_prompts();
    }

    /// Apply the next reply or push.
    ///
    /// Waits while requests are in flight; otherwise only drains pushes that
    /// have already arrived. Returns `false` when there was nothing to apply.
    pub async fn pump(&mut self) -> bool {
        let inbound = if self.in_flight == 0 {
            match self.subscription.as_mut().and_then(Subscription::try_recv) {
                Some(message) => Inbound::Push(message),
                None => return false,
            }
        } else {
            let replies = &mut self.replies_rx;
            match self.subscription.as_mut() {
                Some(subscription) => tokio::select! {
                    Some(envelope) = replies.recv() => Inbound::Reply(envelope),
                    Some(message) = subscription.recv() => Inbound::Push(message),
                    else => return false,
                },
                None => match replies.recv().await {
                    Some(envelope) => Inbound::Reply(envelope),
                    None => return false,
                },
            }
        };
        self.apply(inbound);
        true
    }

    /// Pump until nothing is in flight and no push is waiting.
    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    /// Tear the board down, releasing the push subscription.
    pub fn unmount(mut self) {
        if self.in_flight > 0 {
            warn!("[SESSION] Unmounting with {} request(s) in flight", self.in_flight);
        }
        self.subscription.take();
        info!("[SESSION] Board unmounted");
    }
}
