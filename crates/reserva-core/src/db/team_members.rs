//! Team member repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{NewTeamMember, TeamMember};
use rusqlite::{params, Connection};

use super::now_ms;

/// Trait for team member storage operations
pub trait TeamMemberRepository {
    /// Find a team member by surrogate id
    fn find_by_id(&self, id: i64) -> Result<Option<TeamMember>>;

    /// Find a team member by email (exact match, as stored)
    fn find_by_email(&self, email: &str) -> Result<Option<TeamMember>>;

    /// List team members, name order
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<TeamMember>>;

    /// Insert a new team member, returning the stored row
    fn insert(&self, new: &NewTeamMember) -> Result<TeamMember>;

    /// Overwrite a team member's mutable fields
    fn update(&self, member: &TeamMember) -> Result<()>;

    /// Delete a team member by id
    fn delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `TeamMemberRepository`, scoped to one organization
pub struct SqliteTeamMemberRepository<'a> {
    conn: &'a Connection,
    org_id: &'a str,
}

const COLUMNS: &str =
    "id, org_id, name, email, role, avatar, color, is_active, created_at, updated_at";

impl<'a> SqliteTeamMemberRepository<'a> {
    /// Create a new repository for the given connection and organization
    pub const fn new(conn: &'a Connection, org_id: &'a str) -> Self {
        Self { conn, org_id }
    }

    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeamMember> {
        Ok(TeamMember {
            id: row.get(0)?,
            org_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            role: row.get(4)?,
            avatar: row.get(5)?,
            color: row.get(6)?,
            is_active: row.get::<_, i64>(7)? != 0,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn find_one(&self, sql: &str, params: impl rusqlite::Params) -> Result<Option<TeamMember>> {
        match self.conn.query_row(sql, params, Self::parse_row) {
            Ok(member) => Ok(Some(member)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl TeamMemberRepository for SqliteTeamMemberRepository<'_> {
    fn find_by_id(&self, id: i64) -> Result<Option<TeamMember>> {
        self.find_one(
            &format!("SELECT {COLUMNS} FROM team_members WHERE org_id = ? AND id = ?"),
            params![self.org_id, id],
        )
    }

    fn find_by_email(&self, email: &str) -> Result<Option<TeamMember>> {
        self.find_one(
            &format!("SELECT {COLUMNS} FROM team_members WHERE org_id = ? AND email = ?"),
            params![self.org_id, email],
        )
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<TeamMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM team_members
             WHERE org_id = ?
             ORDER BY name ASC
             LIMIT ? OFFSET ?"
        ))?;

        let members = stmt
            .query_map(
                params![self.org_id, limit as i64, offset as i64],
                Self::parse_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(members)
    }

    fn insert(&self, new: &NewTeamMember) -> Result<TeamMember> {
        let now = now_ms();

        self.conn.execute(
            "INSERT INTO team_members
                 (org_id, name, email, role, avatar, color, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.org_id,
                new.name,
                new.email,
                new.role,
                new.avatar,
                new.color,
                i64::from(new.is_active),
                now,
                now
            ],
        )?;

        Ok(TeamMember {
            id: self.conn.last_insert_rowid(),
            org_id: self.org_id.to_string(),
            name: new.name.clone(),
            email: new.email.clone(),
            role: new.role.clone(),
            avatar: new.avatar.clone(),
            color: new.color.clone(),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, member: &TeamMember) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE team_members
             SET name = ?, email = ?, role = ?, avatar = ?, color = ?, is_active = ?, updated_at = ?
             WHERE org_id = ? AND id = ?",
            params![
                member.name,
                member.email,
                member.role,
                member.avatar,
                member.color,
                i64::from(member.is_active),
                now_ms(),
                self.org_id,
                member.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("team member {}", member.id)));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "DELETE FROM team_members WHERE org_id = ? AND id = ?",
            params![self.org_id, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("team member {id}")));
        }

        Ok(())
    }
}
