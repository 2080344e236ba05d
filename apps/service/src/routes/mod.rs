mod health;
mod metrics;
mod records;

macros_utils::routes! {
    module health,
    module metrics,
    module records,
}
