//! Fixed texts the bot answers with.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{error, warn};

use crate::error::{LookupError, Result};

pub const NO_MATCHES: &str = "Совпадения не найдены";
pub const NEED_RESTART: &str = "Необходимо перезапустить бота.\nОтправьте /start";
pub const AWAITING_FILE: &str = "ожидаю файл";
pub const FILE_SAVED: &str = "файл загружен";
pub const FILE_SAVE_FAILED: &str = "Не удалось загрузить файл";
pub const DATASET_FAILED: &str = "Не удалось прочитать базу узлов, попробуйте позже";

pub fn greeting(first_name: Option<&str>) -> String {
    let salutation = match first_name {
        Some(name) if !name.is_empty() => format!("Здравствуйте {}!", name),
        _ => "Здравствуйте!".to_string(),
    };
    format!(
        "{}\nДля получения информации по узлу отправьте название улицы \
         (можно не полностью, регистр не важен).",
        salutation
    )
}

pub fn unprintable_record(address: &str) -> String {
    format!("Запись {} не может быть показана", address)
}

/// Messages to send for one lookup, in order: one per printable record, a
/// notice for each record that cannot be printed, or `NO_MATCHES`.
/// A dataset that failed to load yields `DATASET_FAILED` alone.
pub fn replies_for(answers: Result<Vec<Result<String>>>) -> Vec<String> {
    let answers = match answers {
        Ok(answers) => answers,
        Err(e) => {
            error!("dataset unavailable: {}", e);
            return vec![DATASET_FAILED.to_string()];
        }
    };
    if answers.is_empty() {
        return vec![NO_MATCHES.to_string()];
    }

    answers
        .into_iter()
        .filter_map(|answer| match answer {
            Ok(text) => Some(text),
            Err(LookupError::MalformedRecord {
                address,
                expected,
                found,
            }) => {
                warn!(address = %address, expected, found, "record cannot be printed");
                Some(unprintable_record(&address))
            }
            Err(e) => {
                error!("formatting failed: {}", e);
                None
            }
        })
        .collect()
}

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Countdown to New Year's Eve, or `None` while it is more than a month away.
///
/// Whole days are floored, so on December 31st itself the count is `0`.
pub fn days_to_new_year(now: NaiveDateTime) -> Option<String> {
    let eve = NaiveDate::from_ymd_opt(now.year(), 12, 31)?.and_hms_opt(0, 0, 0)?;
    let days = (eve - now).num_seconds().div_euclid(SECONDS_PER_DAY);
    if days >= 32 {
        return None;
    }

    let n = days + 1;
    let word = match n {
        2..=4 => "дня",
        1 => "день",
        _ => "дней",
    };
    Some(format!(
        "До Нового Года 🎄🍾🥂🎅 осталось потерпеть {} {} ⏰",
        n, word
    ))
}
