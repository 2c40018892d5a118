use crate::error::{Result, StoreError};
use crate::query::{self, CONTACT_COLUMNS};
use chrono::NaiveDate;
use connectsphere_core::domain::{
    Contact, ContactId, EmailEntry, EmailType, PhoneEntry, PhoneType, TagSet,
};
use connectsphere_core::RemoteQuery;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};

const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Stores a new contact. Ids already present, or retired by a delete,
    /// are rejected.
    pub fn insert(&self, contact: &Contact) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        if is_retired(&tx, &contact.id)? {
            return Err(StoreError::RetiredId(contact.id.to_string()));
        }
        if exists(&tx, &contact.id)? {
            return Err(StoreError::DuplicateId(contact.id.to_string()));
        }
        insert_row(&tx, contact)?;
        write_children(&tx, contact)?;
        tx.commit()?;
        Ok(())
    }

    /// Overwrites a stored contact in place, keeping its position in the
    /// natural order.
    pub fn replace(&self, contact: &Contact) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let updated = update_row(&tx, contact)?;
        if updated == 0 {
            return Err(StoreError::NotFound(contact.id.to_string()));
        }
        write_children(&tx, contact)?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts or replaces; returns true when the contact was new.
    pub fn upsert(&self, contact: &Contact) -> Result<bool> {
        if self.get(&contact.id)?.is_some() {
            self.replace(contact)?;
            Ok(false)
        } else {
            self.insert(contact)?;
            Ok(true)
        }
    }

    pub fn delete(&self, id: &ContactId) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute("DELETE FROM contacts WHERE id = ?1;", [id.as_str()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tx.execute(
            "INSERT OR IGNORE INTO retired_contact_ids (id) VALUES (?1);",
            [id.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn get(&self, id: &ContactId) -> Result<Option<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contacts.id = ?1;");
        let row = self
            .conn
            .query_row(&sql, [id.as_str()], read_row)
            .optional()?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row)?)),
            None => Ok(None),
        }
    }

    /// Every stored contact in natural (insertion) order.
    pub fn list_all(&self) -> Result<Vec<Contact>> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY contacts.seq ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], read_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Executes a remote descriptor against the table.
    pub fn fetch(&self, remote: &RemoteQuery) -> Result<Vec<Contact>> {
        let sql = query::to_sql(remote);
        tracing::debug!(sql = %sql.sql, params = sql.params.len(), "executing contact query");
        let mut stmt = self.conn.prepare(&sql.sql)?;
        let rows = stmt
            .query_map(params_from_iter(sql.params.iter()), read_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }

    fn hydrate(&self, row: ContactRow) -> Result<Contact> {
        let id: ContactId = row
            .id
            .parse()
            .map_err(|_| StoreError::InvalidRow("empty contact id".to_string()))?;
        let mut contact = Contact::new(id, row.first_name, row.last_name);
        contact.nickname = row.nickname;
        contact.company = row.company;
        contact.job_title = row.job_title;
        contact.website = row.website;
        contact.address = row.address;
        contact.notes = row.notes;
        contact.birthday = row
            .birthday
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, BIRTHDAY_FORMAT)
                    .map_err(|_| StoreError::InvalidRow(format!("birthday {raw}")))
            })
            .transpose()?;
        contact.is_favorite = row.is_favorite;
        contact.profile_image = row.profile_image;
        contact.extra = serde_json::from_str::<Map<String, Value>>(&row.extra)?;
        contact.phone_numbers = load_phones(self.conn, &row.id)?;
        contact.emails = load_emails(self.conn, &row.id)?;
        contact.tags = load_tags(self.conn, &row.id)?;
        Ok(contact)
    }
}

struct ContactRow {
    id: String,
    first_name: String,
    last_name: String,
    nickname: Option<String>,
    company: Option<String>,
    job_title: Option<String>,
    website: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    birthday: Option<String>,
    is_favorite: bool,
    profile_image: Option<String>,
    extra: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<ContactRow> {
    Ok(ContactRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        nickname: row.get(3)?,
        company: row.get(4)?,
        job_title: row.get(5)?,
        website: row.get(6)?,
        address: row.get(7)?,
        notes: row.get(8)?,
        birthday: row.get(9)?,
        is_favorite: row.get(10)?,
        profile_image: row.get(11)?,
        extra: row.get(12)?,
    })
}

fn exists(conn: &Connection, id: &ContactId) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM contacts WHERE id = ?1;",
            [id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn is_retired(conn: &Connection, id: &ContactId) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM retired_contact_ids WHERE id = ?1;",
            [id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn birthday_text(contact: &Contact) -> Option<String> {
    contact
        .birthday
        .map(|date| date.format(BIRTHDAY_FORMAT).to_string())
}

fn insert_row(conn: &Connection, contact: &Contact) -> Result<()> {
    let extra = serde_json::to_string(&contact.extra)?;
    conn.execute(
        "INSERT INTO contacts (
            id, first_name, last_name, display_name, nickname, company, job_title,
            website, address, notes, birthday, is_favorite, profile_image, extra
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
        params![
            contact.id.as_str(),
            contact.first_name,
            contact.last_name,
            contact.display_name(),
            contact.nickname,
            contact.company,
            contact.job_title,
            contact.website,
            contact.address,
            contact.notes,
            birthday_text(contact),
            contact.is_favorite,
            contact.profile_image,
            extra,
        ],
    )?;
    Ok(())
}

fn update_row(conn: &Connection, contact: &Contact) -> Result<usize> {
    let extra = serde_json::to_string(&contact.extra)?;
    let updated = conn.execute(
        "UPDATE contacts SET
            first_name = ?2, last_name = ?3, display_name = ?4, nickname = ?5,
            company = ?6, job_title = ?7, website = ?8, address = ?9, notes = ?10,
            birthday = ?11, is_favorite = ?12, profile_image = ?13, extra = ?14
         WHERE id = ?1;",
        params![
            contact.id.as_str(),
            contact.first_name,
            contact.last_name,
            contact.display_name(),
            contact.nickname,
            contact.company,
            contact.job_title,
            contact.website,
            contact.address,
            contact.notes,
            birthday_text(contact),
            contact.is_favorite,
            contact.profile_image,
            extra,
        ],
    )?;
    Ok(updated)
}

fn write_children(conn: &Connection, contact: &Contact) -> Result<()> {
    let id = contact.id.as_str();
    conn.execute("DELETE FROM contact_phones WHERE contact_id = ?1;", [id])?;
    conn.execute("DELETE FROM contact_emails WHERE contact_id = ?1;", [id])?;
    conn.execute("DELETE FROM contact_tags WHERE contact_id = ?1;", [id])?;

    for (position, phone) in contact.phone_numbers.iter().enumerate() {
        conn.execute(
            "INSERT INTO contact_phones (contact_id, position, kind, number, is_primary)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![id, position as i64, phone.kind.as_str(), phone.number, phone.is_primary],
        )?;
    }
    for (position, email) in contact.emails.iter().enumerate() {
        conn.execute(
            "INSERT INTO contact_emails (contact_id, position, kind, email, is_primary)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![id, position as i64, email.kind.as_str(), email.email, email.is_primary],
        )?;
    }
    for (position, tag) in contact.tags.iter().enumerate() {
        conn.execute(
            "INSERT INTO contact_tags (contact_id, position, tag) VALUES (?1, ?2, ?3);",
            params![id, position as i64, tag],
        )?;
    }
    Ok(())
}

fn load_phones(conn: &Connection, id: &str) -> Result<Vec<PhoneEntry>> {
    let mut stmt = conn.prepare(
        "SELECT kind, number, is_primary FROM contact_phones
         WHERE contact_id = ?1 ORDER BY position;",
    )?;
    let rows = stmt
        .query_map([id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(kind, number, is_primary)| {
            let kind = PhoneType::from_label(&kind)
                .ok_or_else(|| StoreError::InvalidRow(format!("phone type {kind}")))?;
            Ok(PhoneEntry {
                kind,
                number,
                is_primary,
            })
        })
        .collect()
}

fn load_emails(conn: &Connection, id: &str) -> Result<Vec<EmailEntry>> {
    let mut stmt = conn.prepare(
        "SELECT kind, email, is_primary FROM contact_emails
         WHERE contact_id = ?1 ORDER BY position;",
    )?;
    let rows = stmt
        .query_map([id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(kind, email, is_primary)| {
            let kind = EmailType::from_label(&kind)
                .ok_or_else(|| StoreError::InvalidRow(format!("email type {kind}")))?;
            Ok(EmailEntry {
                kind,
                email,
                is_primary,
            })
        })
        .collect()
}

fn load_tags(conn: &Connection, id: &str) -> Result<TagSet> {
    let mut stmt =
        conn.prepare("SELECT tag FROM contact_tags WHERE contact_id = ?1 ORDER BY position;")?;
    let tags = stmt
        .query_map([id], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags.into_iter().collect())
}
