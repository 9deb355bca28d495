use crate::github::types::CommitRecord;
use crate::summary::bot::is_bot;
use crate::summary::{Contributor, LastCommit};
use chrono::{DateTime, Datelike, Days, Local, Months, TimeZone, Utc};
use std::collections::HashMap;

const LOCAL_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommitActivity {
    pub last_commit: Option<LastCommit>,
    pub recent_contributors: Vec<Contributor>,
}

/// Start of the trailing window: the month field of local `now` moved back
/// by one.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    month_back(now.with_timezone(&Local))
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Same day and time one month earlier. Days the earlier month lacks roll
/// over into the following month, so Mar 31 maps to Mar 2 in a leap year.
fn month_back<Tz: TimeZone>(now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let day = now.day();
    now.with_day(1)?
        .checked_sub_months(Months::new(1))?
        .checked_add_days(Days::new(u64::from(day - 1)))
}

pub fn local_date(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format(LOCAL_DATE_FORMAT)
        .to_string()
}

/// `commits` is expected newest first, as the commits endpoint returns it.
pub fn aggregate(commits: &[CommitRecord], now: DateTime<Utc>) -> CommitActivity {
    let human: Vec<_> = commits
        .iter()
        .filter_map(|c| c.author.as_ref().map(|a| (c, a)))
        .filter(|(_, author)| !is_bot(&author.login))
        .collect();

    let Some((newest, newest_author)) = human.first() else {
        return CommitActivity::default();
    };

    let last_commit = LastCommit {
        date: local_date(newest.date()),
        committed_at: newest.date(),
        author: newest_author.login.clone(),
        author_url: newest_author.html_url.clone(),
        commit_url: newest.html_url.clone(),
        avatar_url: newest_author.avatar_url.clone(),
    };

    let cutoff = window_start(now);
    let mut recent_contributors: Vec<Contributor> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (commit, author) in &human {
        if commit.date() < cutoff {
            continue;
        }
        match index.get(author.login.as_str()) {
            Some(&i) => recent_contributors[i].commit_count += 1,
            None => {
                index.insert(author.login.as_str(), recent_contributors.len());
                recent_contributors.push(Contributor {
                    login: author.login.clone(),
                    avatar_url: author.avatar_url.clone(),
                    profile_url: author.html_url.clone(),
                    commit_count: 1,
                });
            }
        }
    }

    CommitActivity {
        last_commit: Some(last_commit),
        recent_contributors,
    }
}
