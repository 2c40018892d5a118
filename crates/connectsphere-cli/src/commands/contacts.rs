use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{optional_value, parse_birthday, parse_contact_id, parse_email, parse_phone};
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args};
use connectsphere_config::AppConfig;
use connectsphere_core::domain::Contact;
use connectsphere_core::reducer::{self, ContactDraft, ContactPatch};
use connectsphere_core::{
    counts, normalize, parse_view_query, to_remote_query, view, ContactCardDto, ContactListDto,
    EmptyReason, PagingInfo, RecordStore, SortDirection, SortField, View, ViewParams,
};
use tracing::debug;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub first: String,
    #[arg(long)]
    pub last: String,
    #[arg(long)]
    pub nickname: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub job_title: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub birthday: Option<String>,
    /// `[type:]number`; repeatable, the first is primary
    #[arg(long, value_name = "PHONE")]
    pub phone: Vec<String>,
    /// `[type:]address`; repeatable, the first is primary
    #[arg(long, value_name = "EMAIL")]
    pub email: Vec<String>,
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub favorite: bool,
    #[arg(long)]
    pub image: Option<String>,
}

/// Empty values clear optional fields; repeated list flags replace the list.
#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub first: Option<String>,
    #[arg(long)]
    pub last: Option<String>,
    #[arg(long)]
    pub nickname: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub job_title: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub birthday: Option<String>,
    #[arg(long, value_name = "PHONE")]
    pub phone: Vec<String>,
    #[arg(long, value_name = "EMAIL")]
    pub email: Vec<String>,
    #[arg(long, value_name = "TAG", conflicts_with = "clear_tags")]
    pub tag: Vec<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_tags: bool,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: String,
}

/// Search-box state shared by `list` and `query`.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Search-box syntax: free text, `#tag`, `is:favorite`, `sort:`, `order:`
    #[arg(long, short)]
    pub query: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub favorites: bool,
    #[arg(long)]
    pub sort: Option<SortField>,
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "asc")]
    pub desc: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub asc: bool,
}

impl ViewArgs {
    /// Config defaults, then the query string, then explicit flags.
    pub fn resolve(&self, config: &AppConfig) -> Result<ViewParams> {
        let mut params = match self.query.as_deref() {
            Some(raw) => {
                let mut parsed = parse_view_query(raw)?;
                if !has_selector(raw, "sort:") {
                    parsed.sort_field = config.sort.field;
                }
                if !has_selector(raw, "order:") {
                    parsed.sort_direction = config.sort.direction;
                }
                parsed
            }
            None => ViewParams {
                sort_field: config.sort.field,
                sort_direction: config.sort.direction,
                ..ViewParams::default()
            },
        };
        if let Some(search) = &self.search {
            params.search_text = search.clone();
        }
        if let Some(tag) = &self.tag {
            params.tag_filter = Some(tag.clone());
        }
        if self.favorites {
            params.favorites_only = true;
        }
        if let Some(field) = self.sort {
            params.sort_field = field;
        }
        if self.desc {
            params.sort_direction = SortDirection::Desc;
        } else if self.asc {
            params.sort_direction = SortDirection::Asc;
        }
        Ok(params)
    }
}

fn has_selector(raw: &str, prefix: &str) -> bool {
    raw.split_whitespace().any(|token| token.starts_with(prefix))
}

#[derive(Debug, Args)]
pub struct PagingArgs {
    /// Defaults to the configured page size
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

impl PagingArgs {
    pub fn resolve(&self, config: &AppConfig) -> Result<PagingInfo> {
        let limit = self.limit.unwrap_or(config.page_size);
        if limit == 0 {
            return Err(invalid_input("limit must be at least 1"));
        }
        Ok(PagingInfo {
            limit,
            offset: self.offset,
        })
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    /// Execute a remote descriptor against the store instead of filtering locally
    #[arg(long, action = ArgAction::SetTrue)]
    pub remote: bool,
    #[command(flatten)]
    pub paging: PagingArgs,
}

pub fn add_contact(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let draft = ContactDraft {
        first_name: args.first,
        last_name: args.last,
        nickname: args.nickname,
        company: args.company,
        job_title: args.job_title,
        website: args.website,
        address: args.address,
        notes: args.notes,
        birthday: args.birthday.as_deref().map(parse_birthday).transpose()?,
        phone_numbers: args
            .phone
            .iter()
            .map(|raw| parse_phone(raw))
            .collect::<Result<_>>()?,
        emails: args
            .email
            .iter()
            .map(|raw| parse_email(raw))
            .collect::<Result<_>>()?,
        tags: args.tag,
        is_favorite: args.favorite,
        profile_image: args.image,
        ..ContactDraft::default()
    };

    let snapshot = ctx.store.contacts().list_all()?;
    let created = reducer::create(&snapshot, draft)?.created;
    ctx.store.contacts().insert(&created)?;
    debug!(id = %created.id, "contact created");

    if ctx.json {
        print_json(&created)?;
    } else {
        println!("created {} {}", created.id, created.display_name());
    }
    Ok(())
}

pub fn edit_contact(ctx: &Context<'_>, args: EditArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;

    let mut patch = ContactPatch {
        first_name: args.first,
        last_name: args.last,
        nickname: args.nickname.map(optional_value),
        company: args.company.map(optional_value),
        job_title: args.job_title.map(optional_value),
        website: args.website.map(optional_value),
        address: args.address.map(optional_value),
        notes: args.notes.map(optional_value),
        profile_image: args.image.map(optional_value),
        ..ContactPatch::default()
    };
    if let Some(raw) = args.birthday {
        patch.birthday = Some(match optional_value(raw) {
            Some(value) => Some(parse_birthday(&value)?),
            None => None,
        });
    }
    if !args.phone.is_empty() {
        patch.phone_numbers = Some(
            args.phone
                .iter()
                .map(|raw| parse_phone(raw))
                .collect::<Result<_>>()?,
        );
    }
    if !args.email.is_empty() {
        patch.emails = Some(
            args.email
                .iter()
                .map(|raw| parse_email(raw))
                .collect::<Result<_>>()?,
        );
    }
    if args.clear_tags {
        patch.tags = Some(Vec::new());
    } else if !args.tag.is_empty() {
        patch.tags = Some(args.tag);
    }

    if patch.is_empty() {
        return Err(invalid_input("no updates provided"));
    }

    let snapshot = ctx.store.contacts().list_all()?;
    let next = reducer::update(&snapshot, &id, patch)?;
    let updated = persist_changed(ctx, &next, &id)?;

    if ctx.json {
        print_json(updated)?;
    } else {
        println!("updated {} {}", updated.id, updated.display_name());
    }
    Ok(())
}

pub fn toggle_favorite(ctx: &Context<'_>, args: IdArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let snapshot = ctx.store.contacts().list_all()?;
    let next = reducer::toggle_favorite(&snapshot, &id)?;
    let updated = persist_changed(ctx, &next, &id)?;

    if ctx.json {
        print_json(updated)?;
    } else if updated.is_favorite {
        println!("favorited {} {}", updated.id, updated.display_name());
    } else {
        println!("unfavorited {} {}", updated.id, updated.display_name());
    }
    Ok(())
}

pub fn delete_contact(ctx: &Context<'_>, args: IdArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let snapshot = ctx.store.contacts().list_all()?;
    reducer::delete(&snapshot, &id)?;
    ctx.store.contacts().delete(&id)?;
    debug!(id = %id, "contact deleted");

    if ctx.json {
        print_json(&serde_json::json!({ "id": id }))?;
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

pub fn show_contact(ctx: &Context<'_>, args: IdArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let contact = ctx
        .store
        .contacts()
        .get(&id)?
        .ok_or_else(|| not_found("contact not found"))?;

    if ctx.json {
        return print_json(&contact);
    }

    let card = ContactCardDto::from(&contact);
    println!("{} {}", card.id, card.display_name);
    if card.is_favorite {
        println!("favorite: yes");
    }
    if let Some(position) = &card.position {
        println!("position: {}", position);
    }
    if let Some(nickname) = &contact.nickname {
        println!("nickname: {}", nickname);
    }
    if let Some(birthday) = contact.birthday {
        println!("birthday: {}", birthday.format("%Y-%m-%d"));
    }
    for phone in contact.phone_numbers.iter().filter(|p| !p.number.is_empty()) {
        let marker = if phone.is_primary { " *" } else { "" };
        println!("phone ({}): {}{}", phone.kind.as_str(), phone.number, marker);
    }
    for email in contact.emails.iter().filter(|e| !e.email.is_empty()) {
        let marker = if email.is_primary { " *" } else { "" };
        println!("email ({}): {}{}", email.kind.as_str(), email.email, marker);
    }
    for (label, value) in [
        ("website", &contact.website),
        ("address", &contact.address),
        ("notes", &contact.notes),
    ] {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }
    if !card.tags.is_empty() {
        println!("tags: {}", card.tags.join(", "));
    }
    println!("avatar: {}", card.avatar);
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let params = args.view.resolve(ctx.config)?;
    let paging = args.paging.resolve(ctx.config)?;
    let snapshot = ctx.store.contacts().list_all()?;

    let result = if args.remote {
        remote_page(ctx, &params, paging, snapshot.is_empty())?
    } else {
        local_page(view(&snapshot, &params), paging)
    };

    let dto = ContactListDto::new(&result, counts(&snapshot));
    if ctx.json {
        return print_json(&dto);
    }

    match dto.empty_reason {
        Some(EmptyReason::EmptyCollection) => println!("no contacts yet"),
        Some(EmptyReason::Filtered) => println!("no contacts match"),
        None if dto.items.is_empty() => println!("no contacts on this page"),
        None => {
            for item in &dto.items {
                print_card(item);
            }
        }
    }
    Ok(())
}

/// A page past the end of a non-empty view has no empty reason.
fn local_page(full: View, paging: PagingInfo) -> View {
    if full.contacts.is_empty() {
        return full;
    }
    View {
        contacts: full
            .contacts
            .into_iter()
            .skip(paging.offset)
            .take(paging.limit)
            .collect(),
        empty_reason: None,
    }
}

fn remote_page(
    ctx: &Context<'_>,
    params: &ViewParams,
    paging: PagingInfo,
    collection_empty: bool,
) -> Result<View> {
    let contacts = fetch_remote(ctx, params, paging)?;
    let empty_reason = if !contacts.is_empty() {
        None
    } else if collection_empty {
        Some(EmptyReason::EmptyCollection)
    } else if !params.is_narrowing() {
        None
    } else if paging.offset == 0 {
        Some(EmptyReason::Filtered)
    } else {
        let first = PagingInfo {
            limit: 1,
            offset: 0,
        };
        if fetch_remote(ctx, params, first)?.is_empty() {
            Some(EmptyReason::Filtered)
        } else {
            None
        }
    };
    Ok(View {
        contacts,
        empty_reason,
    })
}

fn fetch_remote(ctx: &Context<'_>, params: &ViewParams, paging: PagingInfo) -> Result<Vec<Contact>> {
    let query = to_remote_query(params, paging);
    let records = ctx
        .store
        .fetch_records(&query)
        .with_context(|| "execute remote query")?;
    debug!(records = records.len(), offset = paging.offset, "remote query returned");
    Ok(records.iter().map(normalize).collect())
}

fn print_card(card: &ContactCardDto) {
    let star = if card.is_favorite { "*" } else { " " };
    let mut line = format!("{} {} {}", star, card.id, card.display_name);
    if let Some(position) = &card.position {
        line.push_str(&format!(" ({})", position));
    }
    if !card.tags.is_empty() {
        let tags: Vec<String> = card.tags.iter().map(|tag| format!("#{}", tag)).collect();
        line.push(' ');
        line.push_str(&tags.join(" "));
    }
    println!("{}", line);
}

fn persist_changed<'a>(
    ctx: &Context<'_>,
    next: &'a [Contact],
    id: &connectsphere_core::ContactId,
) -> Result<&'a Contact> {
    let changed = reducer::find(next, id).ok_or_else(|| not_found("contact not found"))?;
    ctx.store.contacts().replace(changed)?;
    debug!(id = %changed.id, "contact updated");
    Ok(changed)
}
