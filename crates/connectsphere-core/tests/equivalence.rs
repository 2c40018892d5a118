use connectsphere_core::reducer::{self, ContactDraft, ContactPatch};
use connectsphere_core::{
    normalize, primary_count, to_remote_query, view, Contact, ContactId, EmailEntry, EmailType,
    EmptyReason, MemoryRecordStore, PagingInfo, PhoneEntry, PhoneType, RecordStore, SortDirection,
    SortField, ViewParams,
};
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

fn param_grid() -> Vec<ViewParams> {
    let searches = ["", "lee", "  AMY ", "acme", "555 01", "ödön", "engineer", "amy lee", "ŁUK", "zzz"];
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
fn local_view_and_remote_query_agree() {
    let contacts = fixture();
    let store = MemoryRecordStore::new(contacts.clone());
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
            .unwrap()
            .iter()
            .map(normalize)
            .map(|contact| contact.id.to_string())
            .collect();
        assert_eq!(local, remote, "diverged for {params:?}");
    }
}

#[test]
fn repeated_sorts_are_identical() {
    let contacts = fixture();
    for params in param_grid() {
        assert_eq!(view(&contacts, &params), view(&contacts, &params));
    }
}

#[test]
fn lee_ordering_search_and_failed_mutations() {
    let contacts = vec![
        normalize(&json!({"Id": "b", "firstName": "Bob", "lastName": "Lee", "tags": ["Friend"]})),
        normalize(&json!({"Id": "a", "firstName": "Amy", "lastName": "Lee", "tags": ["Team"]})),
    ];

    let sorted = view(&contacts, &ViewParams::default());
    let names: Vec<String> = sorted.contacts.iter().map(Contact::display_name).collect();
    assert_eq!(names, ["Amy Lee", "Bob Lee"]);

    assert_eq!(view(&contacts, &ViewParams::default().search("lee")).len(), 2);

    let none = view(&contacts, &ViewParams::default().search("zzz"));
    assert_eq!(none.empty_reason, Some(EmptyReason::Filtered));
    assert_eq!(
        view(&[], &ViewParams::default()).empty_reason,
        Some(EmptyReason::EmptyCollection)
    );

    let err = reducer::create(
        &contacts,
        ContactDraft {
            first_name: String::new(),
            last_name: "X".to_string(),
            ..Default::default()
        },
    );
    assert!(err.is_err());

    let missing: ContactId = "missing-id".parse().unwrap();
    assert!(reducer::delete(&contacts, &missing)
        .unwrap_err()
        .is_not_found());
    assert_eq!(contacts.len(), 2);
}

#[test]
fn primary_uniqueness_survives_mutation_sequences() {
    let mut collection = fixture();
    let created = reducer::create(
        &collection,
        ContactDraft {
            first_name: "Kim".to_string(),
            last_name: "Park".to_string(),
            emails: vec![
                EmailEntry::new(EmailType::Work, "kim@acme.example").primary(),
                EmailEntry::new(EmailType::Other, "kim@park.example").primary(),
            ],
            ..Default::default()
        },
    )
    .unwrap();
    collection = created.collection;

    for contact_id in collection.iter().map(|c| c.id.clone()).collect::<Vec<_>>() {
        collection = reducer::update(
            &collection,
            &contact_id,
            ContactPatch {
                phone_numbers: Some(vec![
                    PhoneEntry::new(PhoneType::Home, "555 0100").primary(),
                    PhoneEntry::new(PhoneType::Work, "555 0101").primary(),
                ]),
                ..Default::default()
            },
        )
        .unwrap_or(collection);
        collection = reducer::toggle_favorite(&collection, &contact_id).unwrap();
    }

    for contact in &collection {
        assert!(primary_count(&contact.phone_numbers) <= 1, "{:?}", contact.id);
        assert!(primary_count(&contact.emails) <= 1, "{:?}", contact.id);
    }
}

#[test]
fn stroked_letters_sort_beside_base_letters() {
    let contacts = fixture();
    let expected = ["2", "5", "1", "4", "c-3", "9", "8", "7", "6"];
    let local: Vec<String> = view(&contacts, &ViewParams::default())
        .contacts
        .iter()
        .map(|contact| contact.id.to_string())
        .collect();
    assert_eq!(local, expected);

    let store = MemoryRecordStore::new(contacts);
    let remote: Vec<String> = store
        .fetch_records(&to_remote_query(&ViewParams::default(), PagingInfo::default()))
        .unwrap()
        .iter()
        .map(normalize)
        .map(|contact| contact.id.to_string())
        .collect();
    assert_eq!(remote, expected);
}
