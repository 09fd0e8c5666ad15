diesel::table! {
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        phone_number -> Text,
        gender -> Nullable<Text>,
        profession -> Nullable<Text>,
        interest_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    creators (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        phone_number -> Text,
        gender -> Nullable<Text>,
        profession -> Nullable<Text>,
        interest_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    not_interested_users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        not_interested_reason -> Nullable<Text>,
        improvement_suggestions -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    feedback_sessions (id) {
        id -> Uuid,
        session_id -> Uuid,
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    ui_ratings (id) {
        id -> Uuid,
        feedback_session_id -> Uuid,
        visual_design_rating -> Int4,
        visual_design_comments -> Nullable<Text>,
        ease_of_navigation_rating -> Int4,
        ease_of_navigation_comments -> Nullable<Text>,
        mobile_responsiveness_rating -> Int4,
        mobile_responsiveness_comments -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    ux_ratings (id) {
        id -> Uuid,
        feedback_session_id -> Uuid,
        overall_satisfaction_rating -> Int4,
        overall_satisfaction_comments -> Nullable<Text>,
        task_completion_rating -> Int4,
        task_completion_comments -> Nullable<Text>,
        service_quality_rating -> Int4,
        service_quality_comments -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    suggestions (id) {
        id -> Uuid,
        feedback_session_id -> Uuid,
        liked_features -> Nullable<Text>,
        improvement_suggestions -> Nullable<Text>,
        desired_features -> Nullable<Text>,
        legal_challenges -> Nullable<Text>,
        additional_comments -> Nullable<Text>,
        recommend_rating -> Nullable<Int4>,
        follow_up_consent -> Bool,
        follow_up_email -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    admin_users (id) {
        id -> Uuid,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        is_active -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
        last_login -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    refresh_tokens (id) {
        id -> Uuid,
        token_hash -> Text,
        admin_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
        is_revoked -> Bool,
    }
}

diesel::joinable!(ui_ratings -> feedback_sessions (feedback_session_id));
diesel::joinable!(ux_ratings -> feedback_sessions (feedback_session_id));
diesel::joinable!(suggestions -> feedback_sessions (feedback_session_id));
diesel::joinable!(refresh_tokens -> admin_users (admin_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    creators,
    not_interested_users,
    feedback_sessions,
    ui_ratings,
    ux_ratings,
    suggestions,
    admin_users,
    refresh_tokens,
);
