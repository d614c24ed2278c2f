// Derive the collection handle from a navigation target
//
// The handle is the last path segment of the URL once the query string and
// fragment are gone:
// 1. "/collections/foo?sort=price" returns "foo"
// 2. "/collections/foo" returns "foo"
// 3. "https://shop.test/collections/foo#top" returns "foo"
// 4. A bare handle such as "foo" is returned as is
//
// A trailing slash yields an empty handle, the same as the last segment of
// "/collections/foo/" being empty.
pub fn derive_handle(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();

    path.rsplit('/').next().unwrap_or_default().to_owned()
}
