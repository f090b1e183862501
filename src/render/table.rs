//! Interactive follower table: sortable columns, substring filter,
//! numeric columns rounded to whole numbers.

use crate::error::Result;
use crate::types::Follower;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>Follower details</title>
<style>
  body { font-family: sans-serif; margin: 20px; }
  input { margin-bottom: 10px; padding: 4px; width: 280px; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border: 1px solid #ccc; padding: 4px 8px; font-size: 13px; }
  th { background: #f0f0f0; cursor: pointer; user-select: none; }
  tr:nth-child(even) { background: #fafafa; }
</style>
</head>
<body>
<h2>Follower details</h2>
<input id="filter" type="text" placeholder="Filter rows..." />
<table id="followers">
  <thead><tr></tr></thead>
  <tbody></tbody>
</table>
<script>
const data = __DATA__;
const headerRow = document.querySelector('#followers thead tr');
const body = document.querySelector('#followers tbody');
const filter = document.getElementById('filter');
let sortColumn = null;
let sortAscending = true;
for (const [index, column] of data.columns.entries()) {
  const th = document.createElement('th');
  th.textContent = column;
  th.addEventListener('click', () => {
    sortAscending = sortColumn === index ? !sortAscending : true;
    sortColumn = index;
    render();
  });
  headerRow.appendChild(th);
}
function visibleRows() {
  const needle = filter.value.toLowerCase();
  let rows = data.rows.filter((row) =>
    !needle || row.some((cell) => String(cell).toLowerCase().includes(needle)));
  if (sortColumn !== null) {
    rows = rows.slice().sort((a, b) => {
      const x = a[sortColumn];
      const y = b[sortColumn];
      const cmp = (typeof x === 'number' && typeof y === 'number')
        ? x - y
        : String(x).localeCompare(String(y));
      return sortAscending ? cmp : -cmp;
    });
  }
  return rows;
}
function render() {
  body.innerHTML = '';
  for (const row of visibleRows()) {
    const tr = document.createElement('tr');
    for (const cell of row) {
      const td = document.createElement('td');
      td.textContent = cell === null ? '' : cell;
      tr.appendChild(td);
    }
    body.appendChild(tr);
  }
}
filter.addEventListener('input', render);
render();
</script>
</body>
</html>
"#;

const COLUMNS: [&str; 8] = [
    "Screen name",
    "Description",
    "Location",
    "Followers",
    "Statuses",
    "Favorites",
    "Longitude",
    "Latitude",
];

/// Build the table page. Coordinates are rounded to whole numbers for
/// display; unresolved coordinates stay blank, never 0.
pub fn follower_page(followers: &[Follower]) -> Result<String> {
    let rows: Vec<serde_json::Value> = followers
        .iter()
        .map(|f| {
            serde_json::json!([
                f.screen_name,
                f.description,
                f.location,
                f.followers_count,
                f.statuses_count,
                f.favorites_count,
                f.longitude.map(|v| v.round() as i64),
                f.latitude.map(|v| v.round() as i64),
            ])
        })
        .collect();

    let payload = serde_json::json!({
        "columns": COLUMNS,
        "rows": rows,
    });

    Ok(PAGE_TEMPLATE.replace("__DATA__", &serde_json::to_string(&payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower() -> Follower {
        Follower {
            user_id: 1,
            screen_name: "analyst".to_string(),
            description: "data person".to_string(),
            location: None,
            followers_count: 120,
            statuses_count: 3400,
            favorites_count: 56,
            longitude: Some(-122.3300624),
            latitude: Some(47.6038321),
            in_continental_us: true,
        }
    }

    #[test]
    fn coordinates_are_rounded_for_display() {
        let page = follower_page(&[follower()]).unwrap();
        assert!(page.contains("-122,48]"));
        assert!(!page.contains("-122.33"));
    }

    #[test]
    fn unresolved_coordinates_render_blank_not_zero() {
        let mut f = follower();
        f.longitude = None;
        f.latitude = None;
        let page = follower_page(&[f]).unwrap();
        assert!(page.contains("56,null,null]"));
    }

    #[test]
    fn page_embeds_all_columns() {
        let page = follower_page(&[follower()]).unwrap();
        for column in COLUMNS {
            assert!(page.contains(column));
        }
    }
}
