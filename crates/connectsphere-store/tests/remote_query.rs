use connectsphere_core::{
    normalize, to_remote_query, view, Contact, PagingInfo, RecordStore, SortDirection, SortField,
    ViewParams,
};
use connectsphere_store::Store;
use serde_json::json;

fn fixture() -> Vec<Contact> {
    let raw = json!([
        {"Id": 1, "firstName": "Bob", "lastName": "Lee", "tags": ["Friend"], "company": "Zenith"},
        {"Id": 2, "firstName": "Amy", "lastName": "Lee", "tags": ["Team"], "isFavorite": true,
         "emails": "amy@acme.example", "emailType": "work", "company": "Acme", "jobTitle": "Engineer"},
        {"Id": "c-3", "firstName": "Émile", "lastName": "Zola", "tags": "Team,VIP",
         "phoneNumbers": [{"type": "work", "number": "+33 1 555 0199", "isPrimary": true}]},
        {"Id": 4, "firstName": "emile", "lastName": "Ávila", "company": "ácme", "isFavorite": "true"},
        {"Id": 5, "firstName": "Amy", "lastName": "Lee", "tags": ["Friend", "Team"],
         "emails": [{"type": "personal", "email": "amy.lee@home.example"}]},
        {"Id": 6, "firstName": "Zed", "lastName": "Ray", "jobTitle": "Lead engineer", "Owner": 12},
        {"Id": 7, "firstName": "Ödön", "lastName": "Horváth", "company": "Acme", "tags": ["team"]},
        {"Id": 8, "firstName": "Łukasz", "lastName": "Lis", "company": "Øresund", "tags": ["Team"]},
        {"Id": 9, "firstName": "Lucy", "lastName": "Olsen", "company": "Orbit"}
    ]);
    raw.as_array().unwrap().iter().map(normalize).collect()
}

fn seeded() -> (Store, Vec<Contact>) {
    let store = Store::open_in_memory().expect("open");
    store.migrate().expect("migrate");
    let contacts = fixture();
    for contact in &contacts {
        store.contacts().insert(contact).expect("insert");
    }
    (store, contacts)
}

fn param_grid() -> Vec<ViewParams> {
    let searches = ["", "lee", "  AMY ", "acme", "555 01", "ÖDÖN", "engineer", "amy lee", "ŁUK", "zzz"];
    let tags = [None, Some("Team"), Some("Friend"), Some("team"), Some("Missing")];
    let mut grid = Vec::new();
    for search in searches {
        for tag in tags {
            for favorites_only in [false, true] {
                for sort_field in [SortField::Name, SortField::Company] {
                    for sort_direction in [SortDirection::Asc, SortDirection::Desc] {
                        grid.push(ViewParams {
                            search_text: search.to_string(),
                            tag_filter: tag.map(str::to_string),
                            favorites_only,
                            sort_field,
                            sort_direction,
                        });
                    }
                }
            }
        }
    }
    grid
}

#[test]
fn sqlite_store_agrees_with_local_view() {
    let (store, contacts) = seeded();
    let paging = PagingInfo {
        limit: contacts.len(),
        offset: 0,
    };

    for params in param_grid() {
        let local: Vec<String> = view(&contacts, &params)
            .contacts
            .iter()
            .map(|contact| contact.id.to_string())
            .collect();
        let remote: Vec<String> = store
            .fetch_records(&to_remote_query(&params, paging))
            .expect("fetch")
            .iter()
            .map(normalize)
            .map(|contact| contact.id.to_string())
            .collect();
        assert_eq!(local, remote, "diverged for {params:?}");
    }
}

#[test]
fn fetched_records_normalize_to_stored_contacts() {
    let (store, contacts) = seeded();
    let query = to_remote_query(&ViewParams::default(), PagingInfo::default());
    let fetched: Vec<Contact> = store
        .fetch_records(&query)
        .expect("fetch")
        .iter()
        .map(normalize)
        .collect();
    let mut expected = view(&contacts, &ViewParams::default()).contacts;
    // The projection only carries known fields.
    for contact in &mut expected {
        contact.extra.clear();
    }
    assert_eq!(fetched, expected);
}

#[test]
fn paging_slices_the_sorted_result() {
    let (store, contacts) = seeded();
    let all = view(&contacts, &ViewParams::default());
    let page = store
        .contacts()
        .fetch(&to_remote_query(
            &ViewParams::default(),
            PagingInfo {
                limit: 2,
                offset: 3,
            },
        ))
        .expect("fetch");
    let expected: Vec<&Contact> = all.contacts.iter().skip(3).take(2).collect();
    let actual: Vec<&Contact> = page.iter().collect();
    assert_eq!(actual, expected);
}

#[test]
fn stroked_letters_sort_beside_base_letters() {
    let (store, _) = seeded();
    let ids: Vec<String> = store
        .contacts()
        .fetch(&to_remote_query(
            &ViewParams::default().sorted_by(SortField::Company, SortDirection::Asc),
            PagingInfo::default(),
        ))
        .expect("fetch")
        .iter()
        .map(|contact| contact.id.to_string())
        .collect();
    // Empty companies first, then Acme, ácme, Orbit, Øresund, Zenith.
    assert_eq!(ids, ["c-3", "5", "6", "2", "7", "4", "9", "8", "1"]);
}
