diesel::table! {
    companies (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        name -> Text,
        industry -> Nullable<Text>,
        sub_industry -> Nullable<Text>,
        country -> Nullable<Text>,
        region -> Nullable<Text>,
        stage -> Nullable<Text>,
        valuation_target -> Nullable<Float8>,
        funding_goal -> Nullable<Float8>,
        incorporation_year -> Nullable<Int4>,
        pitch_deck_summary -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    founders (id) {
        id -> Uuid,
        company_id -> Uuid,
        name -> Text,
        linkedin_url -> Nullable<Text>,
        education_history -> Nullable<Jsonb>,
        years_domain_experience -> Nullable<Int4>,
        technical_skills -> Array<Text>,
        achievements -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    pitch_decks (id) {
        id -> Uuid,
        company_id -> Uuid,
        core_problem -> Nullable<Text>,
        core_solution -> Nullable<Text>,
        customer_segment -> Nullable<Text>,
        product_summary_md -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    financial_models (id) {
        id -> Uuid,
        company_id -> Uuid,
        monthly_revenue -> Nullable<Float8>,
        burn_rate -> Nullable<Float8>,
        ltv_cac_ratio -> Nullable<Float8>,
        runway_months -> Nullable<Float8>,
        revenue_model_notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    go_to_market (id) {
        id -> Uuid,
        company_id -> Uuid,
        channels -> Array<Text>,
        notes_md -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    metrics (id) {
        id -> Uuid,
        company_id -> Uuid,
        name -> Text,
        value -> Float8,
        unit -> Nullable<Text>,
        date -> Date,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    uploads_queue (id) {
        id -> Uuid,
        file_url -> Text,
        input_type -> Text,
        company_id -> Nullable<Uuid>,
        status -> Text,
        parsed_json -> Jsonb,
        raw_text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    feature_limits (user_id, feature_name) {
        user_id -> Uuid,
        feature_name -> Text,
        limit_value -> Int8,
        unlimited -> Bool,
    }
}

diesel::table! {
    feature_usage (user_id, feature_name) {
        user_id -> Uuid,
        feature_name -> Text,
        usage_count -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(founders -> companies (company_id));
diesel::joinable!(pitch_decks -> companies (company_id));
diesel::joinable!(financial_models -> companies (company_id));
diesel::joinable!(go_to_market -> companies (company_id));
diesel::joinable!(metrics -> companies (company_id));
diesel::joinable!(uploads_queue -> companies (company_id));

diesel::allow_tables_to_appear_in_same_query!(
    companies,
    founders,
    pitch_decks,
    financial_models,
    go_to_market,
    metrics,
    uploads_queue,
    feature_limits,
    feature_usage,
);
