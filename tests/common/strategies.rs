use proptest::prelude::*;

/// Strategy for generating parameter names
pub fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Strategy for generating raw parameter values, including empty strings
pub fn raw_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{0,12}"
}

/// Strategy for generating a parameter with one or more ordered values
pub fn multi_value_param_strategy() -> impl Strategy<Value = (String, Vec<String>)> {
    (
        param_name_strategy(),
        prop::collection::vec(raw_value_strategy(), 1..8),
    )
}

/// Strategy for generating strings that are not valid customer ids
pub fn invalid_customer_id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,10}"
}
