//! SQL issued against the org-roam schema
//!
//! org-roam stores text columns in their printed Lisp form, so string values
//! (including link types) arrive wrapped in double quotes.

pub const IDS: &str = "SELECT id FROM nodes ORDER BY id ASC;";

pub const FILES: &str = "SELECT id, file FROM nodes ORDER BY id ASC;";

pub const TITLES: &str = "SELECT id, title FROM nodes ORDER BY id ASC;";

// The per-field queries below return one row per (node, value) pair, ordered
// by node ID. A LEFT JOIN keeps nodes without values as a single NULL row.

pub const TAGS: &str = "
    SELECT n.id, t.tag
    FROM nodes n
    LEFT JOIN tags t ON n.id = t.node_id
    ORDER BY n.id ASC;";

pub const LINKS: &str = "
    SELECT n.id, l.dest
    FROM nodes n
    LEFT JOIN links l ON n.id = l.source AND l.type IN ('\"id\"', 'id')
    ORDER BY n.id ASC, l.pos ASC;";

pub const MISC_LINKS: &str = "
    SELECT n.id, l.type, l.dest
    FROM nodes n
    LEFT JOIN links l ON n.id = l.source AND l.type NOT IN ('\"id\"', 'id')
    ORDER BY n.id ASC, l.pos ASC;";
