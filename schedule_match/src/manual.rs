/*!

This is the long-form manual for `schedule_match` and `densuke`.

## Input format

The input is the CSV export of a Densuke (伝助) poll. The export is encoded in
Shift_JIS; the command line tool decodes it (see `--encoding`) before handing
the text to [`load_table`](crate::load_table). Spreadsheets (`.xlsx`) with the
same layout are also accepted by the command line tool.

|                 | Alice | Bob | Carol |
|-----------------|-------|-----|-------|
| 4/1(月) 20:00〜 | ◎     | ○   | △     |
| 4/2(火) 20:00〜 | ○     | ○   | ×     |
| 【シナリオ】    |       |     |       |
| 狂気山脈        | ◎     | ○   |       |
| 最終更新日時    | ...   | ... | ...   |

- the first row holds the participant names. The first cell names the label
  column and is otherwise ignored.
- the first column holds the row labels. Labels must be unique; a repeated
  label is dropped with a warning.
- cells hold `◎` (double circle), `○` (circle), `△` (triangle), `×` (cross),
  anything else (kept as is, never matching) or nothing.

## Rows

Rows are sorted by [`classify`](crate::classify):

- a label containing a `month/day` pattern (`\d{1,2}/\d{1,2}`) is a **date row**,
  whatever else it contains.
- otherwise, section separators (labels containing `----`), headings
  (labels wrapped in `【` and `】`) and the `最終更新日時` bookkeeping line are
  skipped.
- everything else is an **option row**: an activity or a scenario. On an
  option row, `◎` marks the people who can host it (GM) and `○` the people
  who want to take part (PL).

All these heuristics live in [`ClassifierRules`](crate::ClassifierRules)
and can be changed.

## Matching days

[`match_dates`](crate::match_dates) returns three lists of days, in priority
order. With the default [`PredicateSet`](crate::PredicateSet):

1. everyone is `◎`
2. everyone is `○` or better
3. everyone is `△` or better

A day may be in several lists. Selecting nobody returns three empty lists.

What "or better" means is controlled by [`TierOrdering`](crate::TierOrdering):

- `Wildcard` (default): `◎` satisfies every threshold, otherwise the symbol
  must be the threshold itself. `○` does not satisfy "`△` or better".
- `Total`: `◎` ⊇ `○` ⊇ `△`.

`PredicateSet::STRICT` requires everyone to have exactly the same symbol.

## Ranking a host's days

Given an option row, a host marked `◎` on it, and a pool of participants,
[`rank_host_participants`](crate::rank_host_participants) lists the days on
which the host is available (host on `◎` first, then `○`, then `△`). For each
day, the participants who can join are the ones whose symbol satisfies
"host's symbol or better". Days are sorted by the number of participants,
ties keeping the order above, and optionally filtered by a minimum number of
participants.

## Output

The decision is a line of text to paste:

- `4/1(月) 20:00〜、メンバー「Alice, Bob」`
- `「狂気山脈」：GM：Alice, PL:Bob, Carol`

See [`Summary`](crate::Summary).

## Configuration of the command line tool

The `--config` flag points to a JSON file. All the keys are optional:

```json
{
  "source": {
    "filePath": "poll.csv",
    "provider": "csv",
    "encoding": "shift_jis",
    "delimiter": ",",
    "excelWorksheetName": null
  },
  "classifier": {
    "datePattern": "\\d{1,2}/\\d{1,2}",
    "excludedSubstrings": ["----"],
    "excludedBrackets": [["【", "】"]],
    "excludedLabels": ["最終更新日時", "コメント"]
  },
  "rules": { "predicates": "atLeast", "ordering": "wildcard", "requiredParticipants": 3 },
  "selection": {
    "members": ["Alice", "Bob"],
    "scenario": null,
    "host": null,
    "pool": null,
    "day": null
  }
}
```

- `filePath`: relative to the directory of the configuration file
- `provider`: `csv` or `xlsx`, guessed from the extension by default
- `delimiter`: one ASCII character, or `\\t` for tabs
- `predicates`: `atLeast` (default) or `strict`
- `ordering`: `wildcard` (default) or `total`

*/
