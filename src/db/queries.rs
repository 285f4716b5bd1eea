use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::models::{BookableEntity, Booking, BookingStatus, EntityType, OperatingProfile};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DT_FORMAT).to_string()
}

fn parse_dt(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DT_FORMAT)
        .map_err(|_| anyhow::anyhow!("invalid stored timestamp: {s}"))
}

// ── Stores & Branches ──

pub fn insert_store(
    conn: &Connection,
    id: &str,
    name: &str,
    working_days: &str,
    opening_time: &str,
    closing_time: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO stores (id, name, working_days, opening_time, closing_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, name, working_days, opening_time, closing_time],
    )?;
    Ok(())
}

pub fn insert_branch(
    conn: &Connection,
    id: &str,
    store_id: &str,
    name: &str,
    working_days: &str,
    opening_time: &str,
    closing_time: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO branches (id, store_id, name, working_days, opening_time, closing_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, store_id, name, working_days, opening_time, closing_time],
    )?;
    Ok(())
}

/// Branch-level hours win when a branch is given; store-level hours are the
/// fallback. Raw working-day text is normalized here, at load time.
pub fn get_operating_profile(
    conn: &Connection,
    store_id: &str,
    branch_id: Option<&str>,
) -> anyhow::Result<Option<OperatingProfile>> {
    let row = match branch_id {
        Some(branch) => conn.query_row(
            "SELECT working_days, opening_time, closing_time FROM branches
             WHERE id = ?1 AND store_id = ?2",
            params![branch, store_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        ),
        None => conn.query_row(
            "SELECT working_days, opening_time, closing_time FROM stores WHERE id = ?1",
            params![store_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        ),
    };

    match row {
        Ok((days, opening, closing)) => {
            Ok(Some(OperatingProfile::parse(&days, &opening, &closing)?))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Entities ──

pub fn insert_entity(conn: &Connection, entity: &BookableEntity) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO entities (id, entity_type, name, store_id, branch_id, staff_id,
            duration_minutes, slot_interval, buffer_minutes, max_concurrent,
            allow_overbooking, min_advance_minutes, max_advance_minutes,
            booking_enabled, auto_confirm, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            entity.id,
            entity.entity_type.as_str(),
            entity.name,
            entity.store_id,
            entity.branch_id,
            entity.staff_id,
            entity.duration_minutes,
            entity.slot_interval,
            entity.buffer_minutes,
            entity.max_concurrent,
            entity.allow_overbooking as i32,
            entity.min_advance_minutes,
            entity.max_advance_minutes,
            entity.booking_enabled as i32,
            entity.auto_confirm as i32,
            entity.active as i32,
        ],
    )?;
    Ok(())
}

pub fn get_entity(
    conn: &Connection,
    id: &str,
    entity_type: EntityType,
) -> anyhow::Result<Option<BookableEntity>> {
    let result = conn.query_row(
        "SELECT id, entity_type, name, store_id, branch_id, staff_id, duration_minutes,
                slot_interval, buffer_minutes, max_concurrent, allow_overbooking,
                min_advance_minutes, max_advance_minutes, booking_enabled, auto_confirm, active
         FROM entities WHERE id = ?1 AND entity_type = ?2",
        params![id, entity_type.as_str()],
        |row| {
            Ok(BookableEntity {
                id: row.get(0)?,
                entity_type,
                name: row.get(2)?,
                store_id: row.get(3)?,
                branch_id: row.get(4)?,
                staff_id: row.get(5)?,
                duration_minutes: row.get(6)?,
                slot_interval: row.get(7)?,
                buffer_minutes: row.get(8)?,
                max_concurrent: row.get(9)?,
                allow_overbooking: row.get::<_, i32>(10)? != 0,
                min_advance_minutes: row.get(11)?,
                max_advance_minutes: row.get(12)?,
                booking_enabled: row.get::<_, i32>(13)? != 0,
                auto_confirm: row.get::<_, i32>(14)? != 0,
                active: row.get::<_, i32>(15)? != 0,
            })
        },
    );

    match result {
        Ok(entity) => Ok(Some(entity)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, entity_id, entity_type, staff_id, customer_id,
            start_time, end_time, status, verification_code, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            booking.id,
            booking.entity_id,
            booking.entity_type.as_str(),
            booking.staff_id,
            booking.customer_id,
            fmt_dt(&booking.start_time),
            fmt_dt(&booking.end_time),
            booking.status.as_str(),
            booking.verification_code,
            booking.notes,
            fmt_dt(&booking.created_at),
            fmt_dt(&booking.updated_at),
        ],
    )?;
    Ok(())
}

/// Non-cancelled bookings that can conflict with a slot in `[from, to)`:
/// bookings for the entity itself plus, when the entity has dedicated staff,
/// that staff member's bookings on any entity. `from` should already be
/// widened by the entity's buffer.
pub fn find_active_bookings(
    conn: &Connection,
    entity: &BookableEntity,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, entity_id, entity_type, staff_id, customer_id, start_time, end_time,
                status, verification_code, notes, created_at, updated_at
         FROM bookings
         WHERE status != 'cancelled'
           AND start_time < ?1 AND end_time > ?2
           AND ((entity_id = ?3 AND entity_type = ?4) OR (?5 IS NOT NULL AND staff_id = ?5))
         ORDER BY start_time ASC",
    )?;

    let rows = stmt.query_map(
        params![
            fmt_dt(&to),
            fmt_dt(&from),
            entity.id,
            entity.entity_type.as_str(),
            entity.staff_id,
        ],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, entity_id, entity_type, staff_id, customer_id, start_time, end_time,
                status, verification_code, notes, created_at, updated_at
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), fmt_dt(&now), id],
    )?;
    Ok(count > 0)
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            "SELECT id, entity_id, entity_type, staff_id, customer_id, start_time, end_time, \
                    status, verification_code, notes, created_at, updated_at \
             FROM bookings WHERE status = ?1 ORDER BY start_time DESC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, entity_id, entity_type, staff_id, customer_id, start_time, end_time, \
                    status, verification_code, notes, created_at, updated_at \
             FROM bookings ORDER BY start_time DESC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let entity_id: String = row.get(1)?;
    let entity_type_str: String = row.get(2)?;
    let staff_id: Option<String> = row.get(3)?;
    let customer_id: String = row.get(4)?;
    let start_time_str: String = row.get(5)?;
    let end_time_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let verification_code: String = row.get(8)?;
    let notes: Option<String> = row.get(9)?;
    let created_at_str: String = row.get(10)?;
    let updated_at_str: String = row.get(11)?;

    let entity_type = EntityType::parse(&entity_type_str)
        .ok_or_else(|| anyhow::anyhow!("invalid stored entity_type: {entity_type_str}"))?;

    Ok(Booking {
        id,
        entity_id,
        entity_type,
        staff_id,
        customer_id,
        start_time: parse_dt(&start_time_str)?,
        end_time: parse_dt(&end_time_str)?,
        status: BookingStatus::parse(&status_str),
        verification_code,
        notes,
        created_at: parse_dt(&created_at_str)?,
        updated_at: parse_dt(&updated_at_str)?,
    })
}
