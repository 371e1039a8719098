//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Trimmed task title.
        title -> Text,
        /// Trimmed task description.
        description -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Optimistic concurrency version.
        version -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
