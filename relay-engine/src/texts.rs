//! User-facing texts sent by the script (clients and managers both read Russian).

use relay_core::{ClientDisplay, ClientId};

/// Greeting for `/start`; sent with HTML parse mode.
pub const GREETING: &str = "Привет! Отправьте ссылку на смету из Petrovich \
<a href=\"https://petrovich.ru/cabinet/estimate/...\"> (пример)</a> или прикрепите фото/файл.";

pub const ESTIMATE_HINT: &str = "Пожалуйста, отправьте ссылку или фото/файл.";
pub const ESTIMATE_RECEIVED: &str = "Данные переданы. Ожидайте цену от менеджера.";
pub const DECISION_PROMPT: &str = "Устраивает? (да/нет)";
pub const DECISION_HINT: &str = "Ответьте 'да' или 'нет'.";
pub const CONTACT_REQUEST: &str = "Отлично! Отправьте имя и номер телефона.";
pub const FEEDBACK_REQUEST: &str = "Жаль. Какие позиции не устроили?";
pub const CONTACT_RECEIVED: &str = "Контакты переданы. Менеджер свяжется.";
pub const FEEDBACK_THANKS: &str = "Спасибо за отзыв!";

pub const BUTTON_YES: &str = "Да";
pub const BUTTON_NO: &str = "Нет";

pub const MANAGER_PRICE_REQUEST: &str = "Рассчитайте и отправьте цену (ответьте в этой теме).";
pub const MANAGER_CLIENT_AGREED: &str = "Клиент согласен.";
pub const MANAGER_CLIENT_DECLINED: &str = "Клиент не согласен.";

/// Prefix for client text re-sent into a thread in resend mode.
pub const RESEND_PREFIX: &str = "От клиента:";

/// Telegram rejects forum topic names longer than this (in characters).
const MAX_THREAD_LABEL_CHARS: usize = 128;

/// Thread label: `Клиент <id> (<username or аноним>)`, truncated to the topic name limit.
pub fn thread_label(client: ClientId, display: &ClientDisplay) -> String {
    let username = display.username.as_deref().unwrap_or("аноним");
    format!("Клиент {} ({})", client, username)
        .chars()
        .take(MAX_THREAD_LABEL_CHARS)
        .collect()
}

/// First message posted into a freshly created thread.
pub fn new_client_notice(client: ClientId, display: &ClientDisplay) -> String {
    format!("Новый клиент: {} (ID: {})", display.full_name, client)
}
