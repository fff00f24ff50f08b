//! Column-name contract for the messages collection
//!
//! The names below are the stable interface between the provider and its
//! callers. Callers build projections and filters from the public set;
//! the provider itself additionally reads the internal columns when
//! composing the implicit filter.

/// Conventional primary-key alias expected by generic list-display
/// callers. The store's real identifier column is [`ID`]; cursors
/// returned by the provider translate lookups for this alias.
pub const PK_ALIAS: &str = "_id";

/// Stable primary key of the messages table.
pub const ID: &str = "id";
/// Server-assigned UID of the message.
pub const UID: &str = "uid";
/// Server-side receive timestamp (epoch milliseconds).
pub const INTERNAL_DATE: &str = "internal_date";
/// Subject line.
pub const SUBJECT: &str = "subject";
/// Date header (epoch milliseconds).
pub const DATE: &str = "date";
/// RFC 5322 Message-ID header.
pub const MESSAGE_ID: &str = "message_id";
/// Serialized sender address list.
pub const SENDER_LIST: &str = "sender_list";
/// Serialized To address list.
pub const TO_LIST: &str = "to_list";
/// Serialized Cc address list.
pub const CC_LIST: &str = "cc_list";
/// Serialized Bcc address list.
pub const BCC_LIST: &str = "bcc_list";
/// Serialized Reply-To address list.
pub const REPLY_TO_LIST: &str = "reply_to_list";
/// Serialized flag set.
pub const FLAGS: &str = "flags";
/// Number of attachments.
pub const ATTACHMENT_COUNT: &str = "attachment_count";
/// Identifier of the owning folder.
pub const FOLDER_ID: &str = "folder_id";
/// Short plain-text preview of the body.
pub const PREVIEW: &str = "preview";
/// Identifier of the thread root message.
pub const THREAD_ROOT: &str = "thread_root";
/// Identifier of the thread parent message.
pub const THREAD_PARENT: &str = "thread_parent";

/// The full public column set, in contract order.
pub const PUBLIC: &[&str] = &[
    ID,
    UID,
    INTERNAL_DATE,
    SUBJECT,
    DATE,
    MESSAGE_ID,
    SENDER_LIST,
    TO_LIST,
    CC_LIST,
    BCC_LIST,
    REPLY_TO_LIST,
    FLAGS,
    ATTACHMENT_COUNT,
    FOLDER_ID,
    PREVIEW,
    THREAD_ROOT,
    THREAD_PARENT,
];

/// Internal-only columns. These back the implicit filter and the store
/// schema; they are never part of the public projection contract.
pub mod internal {
    /// Soft-delete marker. Rows with `deleted = 1` are never returned.
    pub const DELETED: &str = "deleted";
    /// Placeholder marker for messages known only by UID. Rows with
    /// `empty = 1` are never returned.
    pub const EMPTY: &str = "empty";
    /// Raw plain-text body.
    pub const TEXT_CONTENT: &str = "text_content";
    /// Raw HTML body.
    pub const HTML_CONTENT: &str = "html_content";
    /// MIME type of the message body.
    pub const MIME_TYPE: &str = "mime_type";
}
