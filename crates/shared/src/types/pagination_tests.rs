use super::*;
use rstest::rstest;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page_size, 100);
    assert!(request.cursor.is_none());
}

#[test]
fn test_page_request_new_uses_default_size() {
    let request = PageRequest::new(None, None).expect("default is valid");
    assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(request.limit(), 100);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(999)]
#[case(1000)]
fn test_page_request_accepts_in_range(#[case] size: u32) {
    let request = PageRequest::new(Some(size), None).expect("in range");
    assert_eq!(request.page_size, size);
}

#[rstest]
#[case(0)]
#[case(1001)]
#[case(u32::MAX)]
fn test_page_request_rejects_out_of_range(#[case] size: u32) {
    let err = PageRequest::new(Some(size), None).unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));
}

#[test]
fn test_page_request_empty_cursor_is_none() {
    let request = PageRequest::new(Some(10), Some(String::new())).expect("valid");
    assert!(request.cursor.is_none());

    let request = PageRequest::new(Some(10), Some("abc".into())).expect("valid");
    assert_eq!(request.cursor.as_deref(), Some("abc"));
}

#[test]
fn test_page_serializes_camel_case() {
    let page: Page<u8> = Page::new(vec![], None);
    let json = serde_json::to_value(&page).expect("serializable");
    assert_eq!(json, serde_json::json!({ "items": [], "nextCursor": null }));
}
