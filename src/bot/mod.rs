// src/bot/mod.rs

pub mod replies;

use anyhow::Result;
use chrono::Local;
use std::{collections::BTreeMap, collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::Semaphore,
    task::{self, JoinHandle},
    time::{sleep, Instant},
};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::dataset;
use crate::lookup::answer_query;
use crate::session::{Action, SessionStore};
use crate::telegram::BotClient;
use crate::upload::replace_dataset;

const POLL_ERROR_DELAY: Duration = Duration::from_secs(5);

/// Performs actions for one chat. Cheap to clone into spawned tasks.
#[derive(Clone)]
pub struct Responder {
    client: BotClient,
    config: Arc<Config>,
}

impl Responder {
    pub fn new(client: BotClient, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    async fn send(&self, chat_id: i64, text: &str) {
        debug!(chat_id, "reply: {}", text);
        if let Err(e) = self.client.send_message(chat_id, text).await {
            error!(chat_id, "sending reply failed: {:#}", e);
        }
    }

    pub async fn perform(&self, chat_id: i64, action: Action) {
        match action {
            Action::Greet { first_name } => {
                self.send(chat_id, &replies::greeting(first_name.as_deref()))
                    .await
            }
            Action::NeedRestart => self.send(chat_id, replies::NEED_RESTART).await,
            Action::AwaitFile => self.send(chat_id, replies::AWAITING_FILE).await,
            Action::Lookup(query) => self.lookup(chat_id, query).await,
            Action::Countdown => {
                if self.config.new_year_countdown {
                    if let Some(text) = replies::days_to_new_year(Local::now().naive_local()) {
                        self.send(chat_id, &text).await;
                    }
                }
            }
            Action::SaveDataset { file_id } => {
                let saved = replace_dataset(
                    &self.client,
                    &file_id,
                    &self.config.nodes_file,
                    &self.config.schema,
                )
                .await;
                match saved {
                    Ok(_) => self.send(chat_id, replies::FILE_SAVED).await,
                    Err(e) => {
                        error!(chat_id, "saving uploaded dataset failed: {:#}", e);
                        self.send(chat_id, replies::FILE_SAVE_FAILED).await;
                    }
                }
            }
        }
    }

    async fn lookup(&self, chat_id: i64, query: String) {
        let start = Instant::now();
        let path = self.config.nodes_file.clone();
        let variant = self.config.schema.clone();
        debug!(chat_id, query = %query, "lookup");

        // the file is reloaded on every query so uploads take effect at once
        let answers = task::spawn_blocking(move || {
            dataset::load(&path, &variant).map(|table| answer_query(&table, &variant, &query))
        })
        .await;

        let answers = match answers {
            Ok(answers) => answers,
            Err(e) => {
                error!(chat_id, "lookup task failed: {}", e);
                self.send(chat_id, replies::DATASET_FAILED).await;
                return;
            }
        };

        if let Ok(found) = &answers {
            info!(chat_id, matches = found.len(), elapsed = ?start.elapsed(), "lookup done");
        }
        for reply in replies::replies_for(answers) {
            self.send(chat_id, &reply).await;
        }
    }
}

/// Poll for updates until Ctrl-C, answering each chat in its own task.
pub async fn run(config: Config) -> Result<()> {
    let client = BotClient::new(config.token.clone(), &config.api_url)?;
    let config = Arc::new(config);
    let responder = Responder::new(client.clone(), Arc::clone(&config));

    info!(
        path = %config.nodes_file.display(),
        schema = %config.schema.name,
        "using nodes file"
    );

    let mut sessions = SessionStore::new();
    let sem = Arc::new(Semaphore::new(config.max_concurrent_chats));
    // last task per chat; the next one waits for it so replies stay in order
    let mut in_flight: HashMap<i64, JoinHandle<()>> = HashMap::new();
    let mut offset: i64 = 0;

    info!("bot started");
    loop {
        let polled = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            res = client.get_updates(offset, config.poll_timeout) => res,
        };
        let updates = match polled {
            Ok(updates) => updates,
            Err(e) => {
                error!("polling failed: {:#}", e);
                sleep(POLL_ERROR_DELAY).await;
                continue;
            }
        };

        let mut batches: BTreeMap<i64, Vec<Action>> = BTreeMap::new();
        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let chat_id = message.chat.id;
            let Some(event) = message.to_event() else {
                debug!(chat_id, "skipping unsupported message");
                continue;
            };
            debug!(
                chat_id,
                username = message.username().unwrap_or("-"),
                ?event,
                "incoming message"
            );
            let actions = sessions.apply(chat_id, event);
            if !actions.is_empty() {
                batches.entry(chat_id).or_default().extend(actions);
            }
        }

        in_flight.retain(|_, h| !h.is_finished());
        for (chat_id, actions) in batches {
            let previous = in_flight.remove(&chat_id);
            let sem = Arc::clone(&sem);
            let responder = responder.clone();
            let handle = tokio::spawn(async move {
                if let Some(previous) = previous {
                    let _ = previous.await;
                }
                let Ok(_permit) = sem.acquire_owned().await else {
                    return;
                };
                for action in actions {
                    responder.perform(chat_id, action).await;
                }
            });
            in_flight.insert(chat_id, handle);
        }
    }

    for (_, h) in in_flight {
        let _ = h.await;
    }
    info!("bot stopped");
    Ok(())
}
