//! Diesel table definitions mirroring the embedded migrations.

diesel::table! {
    users (id) {
        id -> Int4,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        username -> Varchar,
        password_hash -> Varchar,
        author_pseudonym -> Nullable<Varchar>,
        is_active -> Bool,
    }
}

diesel::table! {
    books (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        cover_image -> Varchar,
        price -> Int4,
        author -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, books);
