//! Property test: any valid value for any known key survives
//! encode → store → read unchanged.

use proptest::prelude::*;
use strata::storage::SqliteStore;
use strata_lib::{ALL_KEYS, Fallback, Scope, SettingKey, SettingValue, ValueKind};

fn value_strategy(key: SettingKey) -> BoxedStrategy<SettingValue> {
    match key.kind() {
        ValueKind::Flag => any::<bool>().prop_map(SettingValue::Flag).boxed(),
        ValueKind::Integer => any::<i64>().prop_map(SettingValue::Integer).boxed(),
        ValueKind::Choice(allowed) => proptest::sample::select(allowed.to_vec())
            .prop_map(|s| SettingValue::Text(s.to_string()))
            .boxed(),
        ValueKind::Text | ValueKind::Secret => "[ -~]{0,40}"
            .prop_map(SettingValue::Text)
            .boxed(),
    }
}

fn entry_strategy() -> impl Strategy<Value = (SettingKey, SettingValue)> {
    proptest::sample::select(ALL_KEYS.to_vec())
        .prop_flat_map(|key| value_strategy(key).prop_map(move |value| (key, value)))
}

proptest! {
    #[test]
    fn stored_value_reads_back_verbatim(
        (key, value) in entry_strategy(),
        owner in 1i64..1000,
        workspace in proptest::option::of(1i64..1000),
    ) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope { owner_id: owner, workspace_id: workspace };

        store.update(key, &value, &scope, false).unwrap();
        let read = store.get(key, "<missing>", &scope, Fallback::default()).unwrap();

        prop_assert_eq!(read, value.encode());
    }

    #[test]
    fn unrelated_scope_never_sees_the_row(
        (key, value) in entry_strategy(),
        owner in 1i64..1000,
    ) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(owner);

        store.update(key, &value, &scope, false).unwrap();
        let read = store
            .get(key, "<missing>", &Scope::company(owner + 1), Fallback::default())
            .unwrap();

        prop_assert_eq!(read, "<missing>");
    }
}
