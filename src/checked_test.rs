use std::collections::HashMap;

use super::*;

fn is_invalid_argument<T>(res: Result<T>) -> bool {
    matches!(res, Err(Error::InvalidArgument(_, _)))
}

#[test]
fn test_null_key_rejected() {
    let mut index: OMap<i32, String> = OMap::new();
    index.set(1, "one".to_string());

    assert!(is_invalid_argument(index.try_set(None, "abc".to_string())));
    assert!(is_invalid_argument(index.try_get::<i32>(None)));
    assert!(is_invalid_argument(index.try_contains_key::<i32>(None)));
    assert!(is_invalid_argument(index.try_remove::<i32>(None)));
    let source: Option<Vec<(Option<i32>, String)>> = None;
    assert!(is_invalid_argument(index.try_put_all(source)));

    // rejected calls leave the index untouched.
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(&1).unwrap(), "one");
    index.validate_llrb().unwrap();
}

#[test]
fn test_checked_ok() {
    let mut index: OMap<i32, &str> = OMap::new();

    assert_eq!(index.try_set(Some(7), "aaa").unwrap(), None);
    assert_eq!(index.try_set(Some(7), "bbb").unwrap(), Some("aaa"));
    assert_eq!(index.try_get(Some(&7)).unwrap(), Some(&"bbb"));
    assert_eq!(index.try_get(Some(&8)).unwrap(), None);
    assert!(index.try_contains_key(Some(&7)).unwrap());
    assert!(!index.try_contains_key(Some(&8)).unwrap());

    // absent key is not an error.
    index.try_remove(Some(&8)).unwrap();
    assert_eq!(index.len(), 1);
    index.try_remove(Some(&7)).unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_try_put_all() {
    let mut hashmap: HashMap<i32, &str> = HashMap::new();
    hashmap.insert(14, "ffff");
    hashmap.insert(100, "ffff");
    hashmap.insert(232, "qwswd");

    let mut index: OMap<i32, &str> = OMap::new();
    let source = hashmap.into_iter().map(|(k, v)| (Some(k), v));
    index.try_put_all(Some(source)).unwrap();

    assert_eq!(index.len(), 3);
    assert!(index.contains_key(&232));
    assert!(index.contains_key(&100));
    assert!(index.contains_key(&14));
}

#[test]
fn test_try_put_all_null_key() {
    let mut index: OMap<i32, &str> = OMap::new();
    let source = vec![(Some(1), "a"), (Some(2), "b"), (None, "d"), (Some(3), "c")];

    assert!(is_invalid_argument(index.try_put_all(Some(source))));
    // entries ahead of the null key are retained.
    assert_eq!(index.keys(), vec![1, 2]);
    assert!(!index.contains_key(&3));
}

#[test]
fn test_error_display() {
    let mut index: OMap<i32, i32> = OMap::new();
    let err = index.try_set(None, 10).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("InvalidArgument"), "{}", msg);
    assert!(msg.contains("null key"), "{}", msg);
    assert_eq!(format!("{:?}", err), msg);
}
